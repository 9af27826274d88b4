use super::UserId;
use serde::{Deserialize, Serialize};

pub type ChirpId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
    pub author_id: UserId,
}
