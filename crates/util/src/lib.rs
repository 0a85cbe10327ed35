//! search-forest-util - Randomized test input for search-forest.

pub mod fuzzer;

pub use fuzzer::Fuzzer;
