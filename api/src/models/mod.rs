mod chirp;
mod snapshot;
mod user;

pub use chirp::{Chirp, ChirpId};
pub use snapshot::{LastIds, Snapshot};
pub use user::{User, UserId};
