use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// Stored user record. The password field only ever holds a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(rename = "is_chirpy_red", default)]
    pub is_promoted: bool,
}
