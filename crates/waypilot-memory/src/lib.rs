//! `waypilot-memory` – the path repository.
//!
//! Routes are recorded once and replayed forever: an ordered list of
//! [`Waypoint`][waypilot_types::Waypoint]s walked cyclically with a single
//! cursor.  The scheduling core only sees the [`Route`] trait.
//!
//! # Modules
//!
//! - [`route`] – [`Route`][route::Route] and its in-memory implementation
//!   [`PathRepository`][route::PathRepository].
//! - [`store`] – [`PathStore`][store::PathStore]: loads and saves routes as
//!   JSON files in a directory, one file per route name.

pub mod route;
pub mod store;

pub use route::{PathRepository, Route};
pub use store::{PathStore, PathStoreError};
