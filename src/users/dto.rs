use serde::Serialize;

/// Public shape of the authenticated caller.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}
