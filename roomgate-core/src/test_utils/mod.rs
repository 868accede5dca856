//! Test utilities and helpers for RoomGate
//!
//! This module provides fixtures, directory doubles and assertions shared by
//! the test suites.

pub mod assertions;
pub mod directories;
pub mod fixtures;

pub use assertions::*;
pub use directories::*;
pub use fixtures::*;
