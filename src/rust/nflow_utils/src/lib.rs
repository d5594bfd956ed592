//! Collection of utility functions for nflowd

#![warn(missing_docs)]

/// Utilities for handling byte strings in hex format
pub mod hex_string;

/// Utilities dealing with Unix Timestamps
pub mod unix_time;
