use std::fmt;

use super::operator::Operator;

/// Snapshot of one segment tree node.
///
/// `value` is the stored aggregate; `pending` is an additive update that has
/// not been pushed into it yet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SegmentNodeSnapshot {
    pub node: usize,
    pub level: usize,
    pub range: (usize, usize),
    pub value: i64,
    pub pending: i64,
    pub is_leaf: bool,
}

/// One step of a traced query.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryStep {
    Visit {
        node: usize,
        range: (usize, usize),
    },
    Skip {
        node: usize,
        range: (usize, usize),
    },
    Match {
        node: usize,
        range: (usize, usize),
        value: i64,
    },
    Combine {
        node: usize,
        range: (usize, usize),
        op: Operator,
        left: i64,
        right: i64,
        value: i64,
    },
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStep::Visit { node, range } => {
                write!(f, "Visiting node {node} covering [{}, {}]", range.0, range.1)
            }
            QueryStep::Skip { range, .. } => write!(
                f,
                "Range [{}, {}] outside query range, returning identity",
                range.0, range.1
            ),
            QueryStep::Match { range, value, .. } => write!(
                f,
                "Range [{}, {}] fully inside query, returning {value}",
                range.0, range.1
            ),
            QueryStep::Combine {
                op,
                left,
                right,
                value,
                ..
            } => write!(f, "Combined results: {left} {op} {right} = {value}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SegmentStats {
    pub node_count: usize,
    pub array_size: usize,
    pub height: usize,
    pub operator: Operator,
    pub is_balanced: bool,
}
