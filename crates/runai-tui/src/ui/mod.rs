//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, sidebar and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `pages`: Page-specific content rendering (chat, documents, etc.)

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
