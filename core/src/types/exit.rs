use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::string_operations::name_matches;
use crate::types::ObjectId;

/// One-way connection from `location` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Exit {
    pub id: ObjectId,
    pub key: String,
    pub aliases: Vec<String>,
    pub location: ObjectId,
    pub destination: ObjectId,
    /// Told to a traveller whose traversal fails.
    pub err_traverse: Option<String>,
    /// A blocked exit refuses traversal when the move completes.
    pub blocked: bool,
}

impl Exit {
    pub fn new(id: ObjectId, key: &str, location: ObjectId, destination: ObjectId) -> Self {
        Exit {
            id,
            key: key.to_string(),
            aliases: Vec::new(),
            location,
            destination,
            err_traverse: None,
            blocked: false,
        }
    }

    /// Exact key or alias match, case-insensitive.
    pub fn answers_to(&self, command: &str) -> bool {
        let command = command.trim();
        self.key.eq_ignore_ascii_case(command)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(command))
    }

    /// Looser match used by `look <exit>`.
    pub fn matches(&self, query: &str) -> bool {
        name_matches(query, &self.key, &self.aliases)
    }
}
