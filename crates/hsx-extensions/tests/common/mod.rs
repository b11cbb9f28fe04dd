//! Common test utilities for hsx-extensions
//!
//! This module provides shared test infrastructure including:
//! - Constants and seeded channels
//! - Request builders for the built-in extension kinds
//! - Assertion helpers over configurations and records

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
