//! Shared test utilities for the ummvar-gen workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Text fixtures (CDL headers, CF tables, token files)
//! - In-memory granule builders
//! - Test data path helpers and a skip macro for optional granules
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod builders;
pub mod fixtures;
pub mod paths;

pub use builders::*;
pub use fixtures::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// Real granules are not checked in; point `TEST_DATA_DIR` at a directory
/// holding them to run these tests.
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_real_granule() {
///     let path = require_test_file!("sample_l2p.nc");
///     // Test code using path...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR to run this test.",
                    $name
                );
                return;
            }
        }
    }};
}
