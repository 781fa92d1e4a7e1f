use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// World-wide persistent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Globals {
    /// Game ticks elapsed since the world was created.
    pub ticker: u64,
    /// Where new and dead characters are placed.
    pub start_room: Option<ObjectId>,
    /// Set while a server has the world loaded.
    pub dirty: bool,
}
