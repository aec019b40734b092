//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s for the current
//! screen. Independent of any rendering.

pub mod map;

pub use cyber_shield_types as types;

pub use map::{key_hint, map_key, should_quit};
