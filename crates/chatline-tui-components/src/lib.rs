//! Shared TUI components for Chatline applications.
//!
//! This crate provides reusable UI components, widgets, and utilities
//! for building terminal chat interfaces.
//!
//! # Architecture
//!
//! The crate is organized into:
//! - `widgets` - Reusable ratatui widgets (header, footer, table, chat, composer, dialogs)
//! - `theme` - Colors, styles, and visual constants
//! - `utils` - Text wrapping, formatting utilities
//!
//! # Usage
//!
//! Components are data-agnostic. Callers map their domain types into the
//! simple structs defined here.

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use utils::{format_clock, format_datetime, wrap_text, wrap_text_indented};
pub use widgets::chat::{ChatLine, ChatWidget, Direction};
pub use widgets::composer::{Composer, ComposerState};
pub use widgets::dialogs::{centered_rect, AlertDialog};
pub use widgets::footer::Footer;
pub use widgets::header::{Header, StatusIndicator};
pub use widgets::table::{DataTable, TableCell, TableColumn, TableRow};
