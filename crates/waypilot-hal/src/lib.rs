//! `waypilot-hal` – the input boundary.
//!
//! The core never calls OS input APIs.  It emits
//! [`InputAction`][waypilot_types::InputAction]s through the [`InputSink`]
//! trait and a backend turns them into key presses and clicks.
//!
//! # Modules
//!
//! - [`input`] – [`InputSink`]: the trait every backend implements, plus
//!   [`RecordingInput`][input::RecordingInput], a backend that only records.
//! - [`screen`] – [`ScreenMapper`][screen::ScreenMapper]: converts
//!   tile-relative click offsets into pixel centres for real backends.
//! - [`sim`] – [`SimWorld`][sim::SimWorld]: an in-process game world that
//!   applies actions and produces snapshots, for headless tests and demos.

pub mod input;
pub mod screen;
pub mod sim;

pub use input::{InputSink, RecordingInput};
pub use screen::ScreenMapper;
pub use sim::{SimWorld, Transition, Trigger};
