use std::collections::VecDeque;

use gloaming_core::types::ObjectId;

/// Buffers text addressed to characters until the session layer flushes it.
#[derive(Debug, Default)]
pub struct NetworkManager {
    outgoing: VecDeque<(ObjectId, String)>,
}

impl NetworkManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, recipient: ObjectId, text: impl Into<String>) {
        let text = text.into();
        log::trace!("-> {}: {}", recipient, text);
        self.outgoing.push_back((recipient, text));
    }

    /// Takes every pending message for `recipient`, oldest first.
    pub fn drain_for(&mut self, recipient: ObjectId) -> Vec<String> {
        let mut taken = Vec::new();
        self.outgoing.retain(|(to, text)| {
            if *to == recipient {
                taken.push(text.clone());
                false
            } else {
                true
            }
        });
        taken
    }

    /// Drops messages for recipients nobody is listening to.
    pub fn discard(&mut self) -> usize {
        let count = self.outgoing.len();
        self.outgoing.clear();
        count
    }

    pub fn pending(&self) -> usize {
        self.outgoing.len()
    }
}
