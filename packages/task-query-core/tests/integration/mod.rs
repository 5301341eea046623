//! Integration test suite for the query core.
//!
//! 1. Seed loading from JSON files
//! 2. Pagination properties across windows
//! 3. Concurrent readers

pub mod concurrency_tests;
pub mod helpers;
pub mod pagination_tests;
pub mod seed_loading_tests;
