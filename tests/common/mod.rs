//! Common test utilities and fixtures for test-relocator integration tests
//!
//! This module provides:
//! - `TestTree` builder for creating throwaway source trees
//! - Source fixtures shaped like real inline test modules

#![allow(dead_code)]

pub mod fixtures;
pub mod test_tree;

pub use test_tree::TestTree;
