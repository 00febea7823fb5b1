use serde::Deserialize;

/// Body for category creation and update.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}
