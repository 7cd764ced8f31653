//! Threaded Snake - a terminal Snake game whose update loop runs on its own
//! fixed-rate task, independent of how fast frames are drawn.
//!
//! This library provides:
//! - Core game logic and the shared state container (game module)
//! - Keyboard mapping and input rules (input module)
//! - TUI rendering (render module)
//! - The interactive driver tying them together (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
