//! Common test utilities and fixtures for cache-check integration tests
//!
//! This module provides:
//! - `TestRepo` builder for creating git repositories with template trees
//! - `RecordingSink` for capturing comments instead of posting them

#![allow(dead_code)]

pub mod test_repo;

pub use test_repo::{RecordingSink, TestRepo};
