pub mod controller;
pub mod handler;

pub use controller::{InputController, InputResponse};
pub use handler::{InputHandler, KeyAction};
