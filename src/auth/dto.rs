use serde::{Deserialize, Serialize};

/// Request body for user registration. All three fields are required; the
/// handler reports whichever are missing.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_camel_case_token_field() {
        let response = LoginResponse {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            access_token: "tok".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "tok");
        assert!(json.get("access_token").is_none());
    }
}
