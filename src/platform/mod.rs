//! Platform abstraction layer
//!
//! The presentation layer owns the window and event loop; the core only
//! needs to know which logical key an event refers to.

pub mod input;

pub use input::{InputEvent, Key};
