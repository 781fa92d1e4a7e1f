/// Server library crate: the world store, the rules engine and the command
/// layer. The `gloaming` binary wraps it in a console session and game loop.

/// Environment-driven server settings.
pub mod config;

/// Direction and other small enums shared by the command layer.
pub mod enums;

/// Fixed-rate loop that drives input, timers and autosave.
pub mod game_loop;

/// Geometry helpers for yells and digging.
pub mod helpers;

/// Zone mini map drawn beside room descriptions.
pub mod mapping;

/// Per-character outgoing text.
pub mod network_manager;

/// Starter world used when no snapshot exists.
pub mod populate;

/// Persistent world store and bincode snapshots.
pub mod repository;

/// Runtime-only side table: movement timers, queued commands, caches.
pub mod runtime;

/// Tick-driven, cancellable one-shot timers.
pub mod scheduler;

/// The rules engine.
pub mod state;
