use super::{Chirp, ChirpId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole database as one value. It is read in full before every
/// operation and written in full after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    pub last_ids: LastIds,
}

/// Highest ID ever handed out per namespace, so deleted IDs stay retired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastIds {
    #[serde(default)]
    pub chirps: ChirpId,
    #[serde(default)]
    pub users: UserId,
}

impl Snapshot {
    pub fn next_chirp_id(&mut self) -> ChirpId {
        let max_present = self.chirps.keys().next_back().copied().unwrap_or(0);
        let id = max_present.max(self.last_ids.chirps) + 1;
        self.last_ids.chirps = id;
        id
    }

    pub fn next_user_id(&mut self) -> UserId {
        let max_present = self.users.keys().next_back().copied().unwrap_or(0);
        let id = max_present.max(self.last_ids.users) + 1;
        self.last_ids.users = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut snapshot = Snapshot::default();
        assert_eq!(snapshot.next_chirp_id(), 1);
        assert_eq!(snapshot.next_user_id(), 1);
    }

    #[test]
    fn deleted_max_id_is_not_reused() {
        let mut snapshot = Snapshot::default();
        for _ in 0..3 {
            let id = snapshot.next_chirp_id();
            snapshot.chirps.insert(
                id,
                Chirp {
                    id,
                    body: "hi".into(),
                    author_id: 1,
                },
            );
        }
        snapshot.chirps.remove(&3);
        assert_eq!(snapshot.next_chirp_id(), 4);
    }

    #[test]
    fn missing_watermark_falls_back_to_max_present_id() {
        let raw = r#"{
            "chirps": {"7": {"id": 7, "body": "old", "author_id": 1}},
            "users": {},
            "revoked_tokens": {}
        }"#;
        let mut snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.last_ids, LastIds::default());
        assert_eq!(snapshot.next_chirp_id(), 8);
    }

    #[test]
    fn json_uses_persisted_field_names() {
        let mut snapshot = Snapshot::default();
        snapshot.users.insert(
            1,
            User {
                id: 1,
                email: "a@b.com".into(),
                password_hash: "hash".into(),
                is_promoted: true,
            },
        );
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["users"]["1"]["password"], "hash");
        assert_eq!(value["users"]["1"]["is_chirpy_red"], true);
        assert!(value["revoked_tokens"].is_object());
    }
}
