//! vfile Test - Shared test utilities for vfile.
//!
//! This crate provides OpenPGP key-ring fixtures, secret-key signers and
//! small file-system helpers, for use as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! vfile-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use vfile_test::{TestContext, TestSigner, fixture_ring};
//!
//! #[test]
//! fn test_signed_by_key0() {
//!     let ctx = TestContext::new();
//!     let key0 = TestSigner::fixture("key0");
//!     let path = ctx.write_signed("signed", b"foo", &[&key0]);
//!
//!     let ring = fixture_ring("key0");
//!     assert!(vfile::open_signed_sig_file(&ring, &path).is_ok());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod signers;

pub use fixtures::*;
pub use harness::*;
pub use signers::*;
