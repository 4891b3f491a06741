//! Shared test fixtures for the Ovation workspace.
//!
//! Unique-id helpers plus canned Hostware payloads, so tests across crates
//! agree on what remote listing records look like.

mod fixtures;

pub use fixtures::*;
