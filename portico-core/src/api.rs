//! Wire envelope shared by every endpoint.
//!
//! Responses carry a stable triplet: numeric `code`, short machine-checkable
//! `message`, and a human-readable `description`. Clients key off `code`
//! (`0` success, `40100` re-login, `40101` missing permission).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    pub description: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            data: Some(data),
            message: "ok".to_string(),
            description: String::new(),
        }
    }

    pub fn error(code: u32, message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            message: message.into(),
            description: description.into(),
        }
    }
}
