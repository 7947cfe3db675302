//! # recordlog testkit
//!
//! Test utilities for recordlog.
//!
//! This crate provides:
//! - Temporary log fixtures and raw-file writers
//! - Property-based test generators using proptest
//! - Crash scenarios that leave torn or malformed tails behind
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recordlog_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_log() {
//!     with_temp_log(|log| {
//!         log.append(b"block")?;
//!         Ok(())
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crash;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::crash::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use crash::*;
pub use fixtures::*;
pub use generators::*;
