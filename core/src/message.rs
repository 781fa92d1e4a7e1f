//! Room messages with two renderings: full detail for observers who can see,
//! and a redacted form for observers in the dark.

use crate::constants::{DARK_OBJECT, DARK_SUBJECT};
use crate::string_operations::capitalize;

/// Which rendering an observer receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    Lit,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Slot { lit: String, dark: String },
}

/// A message made of fixed text and named slots. Each slot carries what a
/// seeing observer is told and what an observer in the dark is told.
///
/// ```
/// use gloaming_core::message::{Message, Rendering};
///
/// let msg = Message::new()
///     .subject("Ayla")
///     .text(" picks up ")
///     .object("a lantern")
///     .text(".");
/// assert_eq!(msg.render(Rendering::Lit), "Ayla picks up a lantern.");
/// assert_eq!(msg.render(Rendering::Dark), "Someone picks up something.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    parts: Vec<Part>,
}

impl Message {
    pub fn new() -> Self {
        Message::default()
    }

    /// Text shown the same way to everyone.
    pub fn text(mut self, text: &str) -> Self {
        self.parts.push(Part::Text(text.to_string()));
        self
    }

    /// A slot with explicit lit and dark renderings.
    pub fn slot(mut self, lit: &str, dark: &str) -> Self {
        self.parts.push(Part::Slot {
            lit: lit.to_string(),
            dark: dark.to_string(),
        });
        self
    }

    /// Whoever acts; "someone" in the dark.
    pub fn subject(self, name: &str) -> Self {
        self.slot(name, DARK_SUBJECT)
    }

    /// Whatever is acted upon; "something" in the dark.
    pub fn object(self, name: &str) -> Self {
        self.slot(name, DARK_OBJECT)
    }

    /// Renders the message. The first letter is always capitalised.
    pub fn render(&self, rendering: Rendering) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match (part, rendering) {
                (Part::Text(text), _) => out.push_str(text),
                (Part::Slot { lit, .. }, Rendering::Lit) => out.push_str(lit),
                (Part::Slot { dark, .. }, Rendering::Dark) => out.push_str(dark),
            }
        }
        capitalize(&out)
    }
}
