//! Cyber Shield (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof as
//! `cyber_shield::{core,adapter,term,input,types}`. The implementation lives
//! in dedicated crates under `crates/`.

pub use cyber_shield_adapter as adapter;
pub use cyber_shield_core as core;
pub use cyber_shield_input as input;
pub use cyber_shield_term as term;
pub use cyber_shield_types as types;
