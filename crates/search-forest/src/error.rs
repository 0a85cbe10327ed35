use thiserror::Error;

use crate::segment::Operator;

/// Rejected segment tree call. The tree is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("invalid range [{lo}, {hi}] for length {len}")]
    InvalidRange { lo: usize, hi: usize, len: usize },
    #[error("range update is not supported for the {0} operator")]
    UnsupportedRangeUpdate(Operator),
}

/// Unknown operator name passed to `Operator::from_str`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown operator: {0:?}")]
pub struct ParseOperatorError(pub String);

/// Broken red-black property found by `RbTree::verify`.
#[derive(Debug, Error, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Violation {
    #[error("Root is not BLACK")]
    RedRoot,
    #[error("Red node {0} has red child")]
    RedRed(String),
    #[error("Black height mismatch at node {key}: left={left}, right={right}")]
    BlackHeightMismatch {
        key: String,
        left: usize,
        right: usize,
    },
    #[error("Broken parent link below node {0}")]
    ParentLink(String),
    #[error("Node order violated at node {0}")]
    Order(String),
}
