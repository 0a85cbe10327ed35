use std::collections::VecDeque;

use crate::error::RangeError;
use crate::oplog::{OpKind, OperationLog};

use super::operator::Operator;
use super::types::{QueryStep, SegmentNodeSnapshot, SegmentStats};

/// Range-aggregate tree over a fixed-length `i64` array.
///
/// Nodes are stored heap-style: the root is slot `0`, the children of `i`
/// are `2i + 1` and `2i + 2`. Backing arrays hold `4 * max(n, 1)` slots.
/// Additive range updates are deferred in a parallel `lazy` array and
/// pushed one level down whenever a node is visited.
pub struct SegmentTree {
    n: usize,
    op: Operator,
    tree: Vec<i64>,
    lazy: Vec<i64>,
    log: OperationLog,
}

#[inline]
fn left(node: usize) -> usize {
    2 * node + 1
}

#[inline]
fn right(node: usize) -> usize {
    2 * node + 2
}

#[inline]
fn mid(start: usize, end: usize) -> usize {
    start + (end - start) / 2
}

impl SegmentTree {
    pub fn new(values: &[i64], op: Operator) -> Self {
        let mut tree = Self {
            n: 0,
            op,
            tree: Vec::new(),
            lazy: Vec::new(),
            log: OperationLog::new(),
        };
        tree.build(values);
        tree
    }

    /// Keeps at most `capacity` operation log entries.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = OperationLog::with_capacity(capacity);
        self
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    /// Levels of the tree, `ceil(log2 n) + 1`, or `0` when empty.
    pub fn height(&self) -> usize {
        if self.n == 0 {
            return 0;
        }
        (usize::BITS - (self.n - 1).leading_zeros()) as usize + 1
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.log
    }

    /// Replaces the contents, resetting every pending update.
    pub fn rebuild(&mut self, values: &[i64]) {
        self.build(values);
    }

    /// Switches the combine operator and rebuilds over the current values.
    pub fn set_operator(&mut self, op: Operator) {
        let values = self.values();
        self.op = op;
        self.build(&values);
    }

    pub fn clear(&mut self) {
        self.reset(0);
        self.log.push(OpKind::Info, "Tree cleared");
    }

    fn reset(&mut self, n: usize) {
        let size = 4 * n.max(1);
        self.n = n;
        self.tree = vec![self.op.identity(); size];
        self.lazy = vec![0; size];
    }

    fn build(&mut self, values: &[i64]) {
        self.reset(values.len());
        if !values.is_empty() {
            self.build_at(values, 0, 0, values.len() - 1);
        }
        self.log.push(
            OpKind::Info,
            format!("Built {} segment tree over {} values", self.op, self.n),
        );
    }

    fn build_at(&mut self, values: &[i64], node: usize, start: usize, end: usize) {
        debug_assert!(node < self.tree.len());
        if start == end {
            self.tree[node] = values[start];
            return;
        }
        let m = mid(start, end);
        self.build_at(values, left(node), start, m);
        self.build_at(values, right(node), m + 1, end);
        self.tree[node] = self.op.combine(self.tree[left(node)], self.tree[right(node)]);
    }

    /// Applies the pending delta of `node` to its own aggregate and hands it
    /// to both children.
    fn push_down(&mut self, node: usize, start: usize, end: usize) {
        let pending = self.lazy[node];
        if pending == 0 {
            return;
        }
        if let Some(v) = self.op.apply_delta(self.tree[node], pending, end - start + 1) {
            self.tree[node] = v;
        }
        if start != end {
            debug_assert!(right(node) < self.lazy.len());
            self.lazy[left(node)] = self.lazy[left(node)].wrapping_add(pending);
            self.lazy[right(node)] = self.lazy[right(node)].wrapping_add(pending);
        }
        self.lazy[node] = 0;
    }

    /// Recomputes `node` from children that may still hold pending deltas.
    fn pull(&mut self, node: usize, start: usize, end: usize) {
        let m = mid(start, end);
        self.push_down(left(node), start, m);
        self.push_down(right(node), m + 1, end);
        self.tree[node] = self.op.combine(self.tree[left(node)], self.tree[right(node)]);
    }

    fn check_range(&self, lo: usize, hi: usize) -> Result<(), RangeError> {
        if lo > hi || hi >= self.n {
            return Err(RangeError::InvalidRange {
                lo,
                hi,
                len: self.n,
            });
        }
        Ok(())
    }

    fn reject(&mut self, err: RangeError) -> RangeError {
        self.log.push(OpKind::Error, err.to_string());
        err
    }

    /// Sets element `index` to `value`.
    pub fn update(&mut self, index: usize, value: i64) -> Result<(), RangeError> {
        if index >= self.n {
            return Err(self.reject(RangeError::IndexOutOfBounds {
                index,
                len: self.n,
            }));
        }
        self.update_at(0, 0, self.n - 1, index, value);
        self.log
            .push(OpKind::Update, format!("Updated index {index} to {value}"));
        Ok(())
    }

    fn update_at(&mut self, node: usize, start: usize, end: usize, index: usize, value: i64) {
        self.push_down(node, start, end);
        if start == end {
            self.tree[node] = value;
            return;
        }
        let m = mid(start, end);
        if index <= m {
            self.update_at(left(node), start, m, index, value);
        } else {
            self.update_at(right(node), m + 1, end, index, value);
        }
        self.pull(node, start, end);
    }

    /// Adds `delta` to every element of `[lo, hi]`.
    pub fn range_update(&mut self, lo: usize, hi: usize, delta: i64) -> Result<(), RangeError> {
        if !self.op.supports_range_update() {
            return Err(self.reject(RangeError::UnsupportedRangeUpdate(self.op)));
        }
        if let Err(err) = self.check_range(lo, hi) {
            return Err(self.reject(err));
        }
        self.range_update_at(0, 0, self.n - 1, lo, hi, delta);
        self.log
            .push(OpKind::Update, format!("Added {delta} to range [{lo}, {hi}]"));
        Ok(())
    }

    fn range_update_at(
        &mut self,
        node: usize,
        start: usize,
        end: usize,
        lo: usize,
        hi: usize,
        delta: i64,
    ) {
        self.push_down(node, start, end);
        if hi < start || end < lo {
            return;
        }
        if lo <= start && end <= hi {
            self.lazy[node] = delta;
            self.push_down(node, start, end);
            return;
        }
        let m = mid(start, end);
        self.range_update_at(left(node), start, m, lo, hi, delta);
        self.range_update_at(right(node), m + 1, end, lo, hi, delta);
        self.pull(node, start, end);
    }

    /// Aggregate of `[lo, hi]` under the current operator. The answer does
    /// not depend on how the range splits across nodes.
    ///
    /// Takes `&mut self` because visited nodes flush their pending deltas.
    pub fn query(&mut self, lo: usize, hi: usize) -> Result<i64, RangeError> {
        self.check_range(lo, hi)?;
        let value = self.query_at(0, 0, self.n - 1, lo, hi, &mut None);
        Ok(self.op.normalize(value))
    }

    /// [`query`](Self::query) plus the list of nodes it visited.
    pub fn query_traced(
        &mut self,
        lo: usize,
        hi: usize,
    ) -> Result<(i64, Vec<QueryStep>), RangeError> {
        self.check_range(lo, hi)?;
        let mut trace = Some(Vec::new());
        let value = self.query_at(0, 0, self.n - 1, lo, hi, &mut trace);
        Ok((self.op.normalize(value), trace.unwrap_or_default()))
    }

    fn query_at(
        &mut self,
        node: usize,
        start: usize,
        end: usize,
        lo: usize,
        hi: usize,
        trace: &mut Option<Vec<QueryStep>>,
    ) -> i64 {
        let range = (start, end);
        if let Some(t) = trace.as_mut() {
            t.push(QueryStep::Visit { node, range });
        }
        self.push_down(node, start, end);

        if hi < start || end < lo {
            if let Some(t) = trace.as_mut() {
                t.push(QueryStep::Skip { node, range });
            }
            return self.op.identity();
        }
        if lo <= start && end <= hi {
            let value = self.tree[node];
            if let Some(t) = trace.as_mut() {
                t.push(QueryStep::Match { node, range, value });
            }
            return value;
        }

        let m = mid(start, end);
        let l = self.query_at(left(node), start, m, lo, hi, trace);
        let r = self.query_at(right(node), m + 1, end, lo, hi, trace);
        let value = self.op.combine(l, r);
        if let Some(t) = trace.as_mut() {
            t.push(QueryStep::Combine {
                node,
                range,
                op: self.op,
                left: l,
                right: r,
                value,
            });
        }
        value
    }

    /// Current element values with every pending delta applied.
    pub fn values(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.n);
        if self.n > 0 {
            self.collect_values(0, 0, self.n - 1, 0, &mut out);
        }
        out
    }

    fn collect_values(&self, node: usize, start: usize, end: usize, acc: i64, out: &mut Vec<i64>) {
        let acc = acc.wrapping_add(self.lazy[node]);
        if start == end {
            out.push(self.tree[node].wrapping_add(acc));
            return;
        }
        let m = mid(start, end);
        self.collect_values(left(node), start, m, acc, out);
        self.collect_values(right(node), m + 1, end, acc, out);
    }

    fn snapshot(&self, node: usize, level: usize, start: usize, end: usize) -> SegmentNodeSnapshot {
        SegmentNodeSnapshot {
            node,
            level,
            range: (start, end),
            value: self.tree[node],
            pending: self.lazy[node],
            is_leaf: start == end,
        }
    }

    /// Pre-order listing of every live node.
    pub fn tree_structure(&self) -> Vec<SegmentNodeSnapshot> {
        fn walk(
            t: &SegmentTree,
            node: usize,
            level: usize,
            start: usize,
            end: usize,
            out: &mut Vec<SegmentNodeSnapshot>,
        ) {
            out.push(t.snapshot(node, level, start, end));
            if start != end {
                let m = mid(start, end);
                walk(t, left(node), level + 1, start, m, out);
                walk(t, right(node), level + 1, m + 1, end, out);
            }
        }

        let mut out = Vec::new();
        if self.n > 0 {
            walk(self, 0, 0, 0, self.n - 1, &mut out);
        }
        out
    }

    pub fn level_order(&self) -> Vec<Vec<SegmentNodeSnapshot>> {
        let mut levels: Vec<Vec<SegmentNodeSnapshot>> = Vec::new();
        if self.n == 0 {
            return levels;
        }
        let mut queue = VecDeque::from([(0usize, 0usize, 0usize, self.n - 1)]);
        while let Some((node, level, start, end)) = queue.pop_front() {
            if levels.len() == level {
                levels.push(Vec::new());
            }
            levels[level].push(self.snapshot(node, level, start, end));
            if start != end {
                let m = mid(start, end);
                queue.push_back((left(node), level + 1, start, m));
                queue.push_back((right(node), level + 1, m + 1, end));
            }
        }
        levels
    }

    pub fn stats(&self) -> SegmentStats {
        SegmentStats {
            node_count: if self.n == 0 { 0 } else { 2 * self.n - 1 },
            array_size: self.tree.len(),
            height: self.height(),
            operator: self.op,
            is_balanced: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_four_times_len() {
        let tree = SegmentTree::new(&[1, 2, 3], Operator::Sum);
        assert_eq!(tree.stats().array_size, 12);
        let empty = SegmentTree::new(&[], Operator::Sum);
        assert_eq!(empty.stats().array_size, 4);
        assert_eq!(empty.height(), 0);
    }

    #[test]
    fn point_update_sees_pending_sibling_delta() {
        let mut tree = SegmentTree::new(&[1, 2, 3, 4], Operator::Sum);
        tree.range_update(2, 3, 10).unwrap();
        tree.update(0, 5).unwrap();
        assert_eq!(tree.query(0, 3).unwrap(), 5 + 2 + 13 + 14);
        assert_eq!(tree.values(), vec![5, 2, 13, 14]);
    }

    #[test]
    fn values_applies_pending_without_query() {
        let mut tree = SegmentTree::new(&[4, 8, 15, 16, 23, 42], Operator::Max);
        tree.range_update(0, 5, 1).unwrap();
        tree.range_update(1, 2, -3).unwrap();
        assert_eq!(tree.values(), vec![5, 6, 13, 17, 24, 43]);
    }

    #[test]
    fn gcd_answer_is_independent_of_tree_shape() {
        let mut single = SegmentTree::new(&[-6], Operator::Gcd);
        let mut pair = SegmentTree::new(&[-6, 4], Operator::Gcd);
        assert_eq!(single.query(0, 0), Ok(6));
        assert_eq!(pair.query(0, 0), Ok(6));
        assert_eq!(pair.query(0, 1), Ok(2));
        let (value, _) = single.query_traced(0, 0).unwrap();
        assert_eq!(value, 6);
        assert_eq!(single.values(), vec![-6]);
    }

    #[test]
    fn height_matches_levels() {
        for n in 1..=33 {
            let values: Vec<i64> = (0..n as i64).collect();
            let tree = SegmentTree::new(&values, Operator::Min);
            assert_eq!(tree.height(), tree.level_order().len(), "n = {n}");
        }
    }
}
