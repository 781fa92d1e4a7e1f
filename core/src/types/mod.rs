//! Entity records. Every persistent field is a named, typed field; runtime-only
//! state (timers, queued commands, caches) lives in the server's side table.

mod character;
mod exit;
mod global;
mod ids;
mod item;
mod room;

pub use character::{Character, Stats};
pub use exit::Exit;
pub use global::Globals;
pub use ids::{Location, ObjectId};
pub use item::{
    Consumable, Container, Effect, Garment, Item, ItemKind, Liquid, LiquidContainer, Worn,
};
pub use room::Room;
