//! Application layer: events, key mapping and the controller that owns all state.

mod controller;
mod event;
mod keys;

pub use controller::Controller;
pub use event::Event;
pub use keys::{Command, Input, key_event, parse_input};
