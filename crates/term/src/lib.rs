//! Terminal front end.
//!
//! A thin presentation layer: [`view`] turns a session snapshot into styled
//! text lines (pure, testable) and [`renderer`] writes them to the terminal.
//! All game rules stay in `core`.

pub mod renderer;
pub mod view;

pub use cyber_shield_core as core;
pub use cyber_shield_types as types;

pub use renderer::{changed_rows, encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{meter, wrap, Line, SessionView, Tone};
