//! Dynamic Time Warping alignment
//!
//! Finds the minimum cumulative frame-to-frame Euclidean cost of aligning two
//! frame sequences under the classical warping-path constraints (monotonic,
//! contiguous, from the first frame pair to the last). The accumulated cost is
//! divided by `n + m` so sequences of different lengths give comparable values.
//!
//! Two entry points share the same recurrence and produce bit-identical
//! distances:
//!
//! - [`dtw_align`] keeps the full `(n+1)×(m+1)` cost table and can recover the
//!   warping path. O(n·m) time and space.
//! - [`dtw_distance`] keeps only two rows. O(n·m) time, O(min(n, m)) space.
//!
//! # Example
//!
//! ```
//! use stratum_compare::features::{dtw_distance, FrameSequence};
//!
//! let a = FrameSequence::from_frames(&[vec![0.0], vec![0.0], vec![0.0]])?;
//! let b = FrameSequence::from_frames(&[vec![1.0], vec![1.0], vec![1.0]])?;
//! // Three unit steps along the diagonal, normalized by 3 + 3
//! assert!((dtw_distance(&a, &b)? - 0.5).abs() < 1e-12);
//! # Ok::<(), stratum_compare::ComparisonError>(())
//! ```

use super::distance::frame_distance;
use super::sequence::FrameSequence;
use crate::error::ComparisonError;

/// Full DTW result: normalized distance plus the accumulated cost table
#[derive(Debug, Clone, PartialEq)]
pub struct DtwAlignment {
    distance: f64,
    rows: usize,
    cols: usize,
    table: Vec<f64>,
}

impl DtwAlignment {
    /// Accumulated cost divided by `n + m`
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Raw accumulated cost `table[n][m]`
    pub fn total_cost(&self) -> f64 {
        self.table[self.table.len() - 1]
    }

    /// Table shape `(n + 1, m + 1)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Accumulated cost at table cell `(i, j)`; row 0 and column 0 are the
    /// padding border (`+∞` except the origin)
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside [`DtwAlignment::shape`].
    pub fn cost_at(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "cell ({}, {}) out of bounds", i, j);
        self.table[i * self.cols + j]
    }

    /// Row-major cost table including the padding border
    pub fn cost_table(&self) -> &[f64] {
        &self.table
    }

    /// Optimal warping path as `(frame_a, frame_b)` index pairs, first to last
    ///
    /// Ties between predecessors prefer the diagonal step, then the step that
    /// advances sequence `a`.
    pub fn warping_path(&self) -> Vec<(usize, usize)> {
        let mut i = self.rows - 1;
        let mut j = self.cols - 1;
        let mut path = Vec::with_capacity(i + j);
        path.push((i - 1, j - 1));

        while i > 1 || j > 1 {
            if i == 1 {
                j -= 1;
            } else if j == 1 {
                i -= 1;
            } else {
                let diag = self.cost_at(i - 1, j - 1);
                let up = self.cost_at(i - 1, j);
                let left = self.cost_at(i, j - 1);
                if diag <= up && diag <= left {
                    i -= 1;
                    j -= 1;
                } else if up <= left {
                    i -= 1;
                } else {
                    j -= 1;
                }
            }
            path.push((i - 1, j - 1));
        }

        path.reverse();
        path
    }
}

fn check_inputs(a: &FrameSequence, b: &FrameSequence) -> Result<(), ComparisonError> {
    // Unreachable through the FrameSequence constructors; an empty side would yield +inf / 0.
    if a.n_frames() == 0 || b.n_frames() == 0 {
        return Err(ComparisonError::EmptySequence(format!(
            "DTW requires non-empty sequences, got {} and {} frames",
            a.n_frames(),
            b.n_frames()
        )));
    }
    if a.dimension() != b.dimension() {
        return Err(ComparisonError::DimensionMismatch(format!(
            "DTW frames have dimension {} and {}",
            a.dimension(),
            b.dimension()
        )));
    }
    Ok(())
}

#[inline]
fn local_cost(a: &[f64], b: &[f64]) -> f64 {
    frame_distance(a, b)
}

#[inline]
fn step(up: f64, left: f64, diag: f64) -> f64 {
    up.min(left).min(diag)
}

/// Align two sequences and keep the full cost table
///
/// # Errors
///
/// - `EmptySequence` if either sequence has no frames
/// - `DimensionMismatch` if the frame dimensions differ
pub fn dtw_align(a: &FrameSequence, b: &FrameSequence) -> Result<DtwAlignment, ComparisonError> {
    check_inputs(a, b)?;

    let n = a.n_frames();
    let m = b.n_frames();
    let rows = n + 1;
    let cols = m + 1;
    log::debug!("DTW align: {}x{} frames, dimension {}", n, m, a.dimension());

    let mut table = vec![f64::INFINITY; rows * cols];
    table[0] = 0.0;

    for i in 1..rows {
        let frame_a = a.frame(i - 1);
        for j in 1..cols {
            let cost = local_cost(frame_a, b.frame(j - 1));
            table[i * cols + j] = cost
                + step(
                    table[(i - 1) * cols + j],     // insertion
                    table[i * cols + j - 1],       // deletion
                    table[(i - 1) * cols + j - 1], // match
                );
        }
    }

    let distance = table[rows * cols - 1] / (n + m) as f64;
    Ok(DtwAlignment {
        distance,
        rows,
        cols,
        table,
    })
}

/// Normalized DTW distance using two rolling rows
///
/// The shorter sequence indexes the rows kept in memory. DTW is symmetric, so
/// the result equals `dtw_align(a, b)?.distance()` exactly.
///
/// # Errors
///
/// - `EmptySequence` if either sequence has no frames
/// - `DimensionMismatch` if the frame dimensions differ
pub fn dtw_distance(a: &FrameSequence, b: &FrameSequence) -> Result<f64, ComparisonError> {
    check_inputs(a, b)?;

    let (outer, inner) = if a.n_frames() >= b.n_frames() { (a, b) } else { (b, a) };
    let n = outer.n_frames();
    let m = inner.n_frames();
    log::debug!("DTW distance: {}x{} frames, dimension {}", n, m, a.dimension());

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for i in 1..=n {
        let frame_outer = outer.frame(i - 1);
        curr[0] = f64::INFINITY;
        for j in 1..=m {
            let cost = local_cost(frame_outer, inner.frame(j - 1));
            curr[j] = cost + step(prev[j], curr[j - 1], prev[j - 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    Ok(prev[m] / (n + m) as f64)
}
