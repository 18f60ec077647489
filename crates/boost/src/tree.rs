//! Regression tree stored as a node arena, and its greedy grower.
//!
//! **Not part of the public API.**

use ndarray::ArrayView2;
use rayon::prelude::*;

/// Splits must improve the penalised squared error by more than this.
const MIN_GAIN: f64 = 1e-12;

/// A tree node. Children are indices into the owning [`Tree`]'s arena.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        gain: f64,
    },
    /// Shrunk leaf prediction.
    Leaf { value: f64 },
}

/// One boosting round's tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Evaluates the tree; `feature_value(f)` returns feature `f` of the row.
    pub(crate) fn predict(&self, feature_value: impl Fn(usize) -> f64) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if feature_value(feature) <= threshold {
                        left
                    } else {
                        right
                    }
                }
            }
        }
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Settings for growing a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowParams {
    pub(crate) max_depth: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) l2: f64,
    pub(crate) learning_rate: f64,
}

/// Grows a least-squares tree on `target[rows]` using `features`.
///
/// `features` must be sorted ascending; ties in gain go to the lower
/// feature index, then the lower threshold.
pub(crate) fn grow(
    x: ArrayView2<'_, f64>,
    target: &[f64],
    rows: Vec<usize>,
    features: &[usize],
    params: &GrowParams,
) -> Tree {
    let mut nodes = Vec::new();
    build(&mut nodes, x, target, rows, features, params, 0);
    Tree { nodes }
}

fn build(
    nodes: &mut Vec<Node>,
    x: ArrayView2<'_, f64>,
    target: &[f64],
    rows: Vec<usize>,
    features: &[usize],
    params: &GrowParams,
    depth: usize,
) -> usize {
    let idx = nodes.len();
    let sum: f64 = rows.iter().map(|&r| target[r]).sum();
    nodes.push(Node::Leaf {
        value: params.learning_rate * sum / (rows.len() as f64 + params.l2),
    });

    if depth >= params.max_depth || rows.len() < 2 * params.min_samples_leaf {
        return idx;
    }
    let Some(split) = best_split(x, target, &rows, sum, features, params) else {
        return idx;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .partition(|&&r| x[[r, split.feature]] <= split.threshold);
    let left = build(nodes, x, target, left_rows, features, params, depth + 1);
    let right = build(nodes, x, target, right_rows, features, params, depth + 1);
    nodes[idx] = Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left,
        right,
        gain: split.gain,
    };
    idx
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn best_split(
    x: ArrayView2<'_, f64>,
    target: &[f64],
    rows: &[usize],
    sum: f64,
    features: &[usize],
    params: &GrowParams,
) -> Option<Candidate> {
    let parent = sum * sum / (rows.len() as f64 + params.l2);
    let per_feature: Vec<Option<Candidate>> = features
        .par_iter()
        .map(|&f| scan_feature(x, target, rows, f, sum, parent, params))
        .collect();
    per_feature
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Candidate>, c| match best {
            Some(b) if b.gain >= c.gain => Some(b),
            _ => Some(c),
        })
}

/// Exact scan over the sorted values of one feature.
fn scan_feature(
    x: ArrayView2<'_, f64>,
    target: &[f64],
    rows: &[usize],
    feature: usize,
    sum: f64,
    parent: f64,
    params: &GrowParams,
) -> Option<Candidate> {
    let mut pairs: Vec<(f64, f64)> = rows.iter().map(|&r| (x[[r, feature]], target[r])).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = pairs.len();
    let min_leaf = params.min_samples_leaf;
    let mut best: Option<Candidate> = None;
    let mut left_sum = 0.0;
    for i in 1..n {
        left_sum += pairs[i - 1].1;
        if i < min_leaf || n - i < min_leaf || pairs[i - 1].0 >= pairs[i].0 {
            continue;
        }
        let right_sum = sum - left_sum;
        let gain = left_sum * left_sum / (i as f64 + params.l2)
            + right_sum * right_sum / ((n - i) as f64 + params.l2)
            - parent;
        if gain > MIN_GAIN && best.is_none_or(|b| gain > b.gain) {
            let (lo, hi) = (pairs[i - 1].0, pairs[i].0);
            let mid = lo + (hi - lo) / 2.0;
            best = Some(Candidate {
                feature,
                threshold: if mid < hi { mid } else { lo },
                gain,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    fn params(depth: usize) -> GrowParams {
        GrowParams {
            max_depth: depth,
            min_samples_leaf: 1,
            l2: 0.0,
            learning_rate: 1.0,
        }
    }

    #[test]
    fn stump_finds_step() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y: Vec<f64> = (0..10).map(|i| if i < 4 { -1.0 } else { 2.0 }).collect();
        let tree = grow(x.view(), &y, (0..10).collect(), &[0], &params(1));
        assert_eq!(tree.depth(), 1);
        match tree.nodes()[0] {
            Node::Split { threshold, .. } => assert_abs_diff_eq!(threshold, 3.5),
            _ => panic!("expected split"),
        }
        assert_abs_diff_eq!(tree.predict(|_| 0.0), -1.0);
        assert_abs_diff_eq!(tree.predict(|_| 9.0), 2.0);
    }

    #[test]
    fn picks_informative_feature() {
        let x =
            Array2::from_shape_fn((20, 2), |(i, j)| if j == 0 { (i % 3) as f64 } else { i as f64 });
        let y: Vec<f64> = (0..20).map(|i| if i >= 10 { 5.0 } else { 0.0 }).collect();
        let tree = grow(x.view(), &y, (0..20).collect(), &[0, 1], &params(1));
        assert!(matches!(tree.nodes()[0], Node::Split { feature: 1, .. }));
    }

    #[test]
    fn tie_goes_to_lower_feature_index() {
        let x = Array2::from_shape_fn((8, 2), |(i, _)| i as f64);
        let y: Vec<f64> = (0..8).map(|i| if i < 4 { 0.0 } else { 1.0 }).collect();
        let tree = grow(x.view(), &y, (0..8).collect(), &[0, 1], &params(1));
        assert!(matches!(tree.nodes()[0], Node::Split { feature: 0, .. }));
    }

    #[test]
    fn respects_min_samples_leaf() {
        let x = Array2::from_shape_fn((6, 1), |(i, _)| i as f64);
        let y = vec![10.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let p = GrowParams {
            min_samples_leaf: 3,
            ..params(2)
        };
        let tree = grow(x.view(), &y, (0..6).collect(), &[0], &p);
        match tree.nodes()[0] {
            Node::Split { threshold, .. } => assert_abs_diff_eq!(threshold, 2.5),
            _ => panic!("expected split"),
        }
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn depth_is_capped_by_max_depth() {
        let x = Array2::from_shape_fn((16, 1), |(i, _)| i as f64);
        let y: Vec<f64> = (0..16).map(|i| i as f64).collect();
        for max_depth in 1..=3 {
            let tree = grow(x.view(), &y, (0..16).collect(), &[0], &params(max_depth));
            assert_eq!(tree.depth(), max_depth);
        }
    }

    #[test]
    fn constant_target_is_single_leaf() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = vec![3.0; 10];
        let tree = grow(x.view(), &y, (0..10).collect(), &[0], &params(3));
        assert_eq!(tree.nodes().len(), 1);
        assert_abs_diff_eq!(tree.predict(|_| 0.0), 3.0);
    }

    #[test]
    fn leaves_are_shrunk_and_penalised() {
        let x = Array2::from_shape_fn((4, 1), |(i, _)| i as f64);
        let y = vec![2.0; 4];
        let p = GrowParams {
            max_depth: 1,
            min_samples_leaf: 1,
            l2: 4.0,
            learning_rate: 0.5,
        };
        let tree = grow(x.view(), &y, (0..4).collect(), &[0], &p);
        // 0.5 * 8 / (4 + 4)
        assert_abs_diff_eq!(tree.predict(|_| 0.0), 0.5);
    }
}
