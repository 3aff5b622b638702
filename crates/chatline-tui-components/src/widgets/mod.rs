//! Reusable TUI widgets.

pub mod chat;
pub mod composer;
pub mod dialogs;
pub mod footer;
pub mod header;
pub mod table;
