//! Input schema for captured quiz interactions
//!
//! Defines the interaction event stream handed over by the capture layer and
//! the session document that wraps it, plus parsing and boundary validation.

mod adapter;
mod event;

pub use adapter::*;
pub use event::*;
