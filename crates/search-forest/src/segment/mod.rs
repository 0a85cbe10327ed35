//! Segment tree with lazy range updates.
pub mod operator;
pub mod tree;
pub mod types;

pub use operator::{gcd, Operator};
pub use tree::SegmentTree;
pub use types::{QueryStep, SegmentNodeSnapshot, SegmentStats};
