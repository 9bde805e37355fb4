//! Precomputed similarity matrices and the index spaces that address them.
//!
//! The content matrix is laid out in catalog row order, the collaborative
//! matrix in pivot order. Each space gets its own index newtype so a row
//! position from one can never be used to read the other.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::error::{RecError, Result};

/// A position in some similarity index space.
pub trait IndexSpace: Copy + fmt::Debug {
    /// Human-readable name of the space, used in logs and errors.
    const NAME: &'static str;

    fn from_position(position: usize) -> Self;
    fn position(self) -> usize;
}

/// Position of a product in catalog row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowIndex(pub usize);

/// Position of a name in the collaborative pivot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PivotIndex(pub usize);

impl IndexSpace for RowIndex {
    const NAME: &'static str = "catalog rows";

    fn from_position(position: usize) -> Self {
        RowIndex(position)
    }

    fn position(self) -> usize {
        self.0
    }
}

impl IndexSpace for PivotIndex {
    const NAME: &'static str = "pivot index";

    fn from_position(position: usize) -> Self {
        PivotIndex(position)
    }

    fn position(self) -> usize {
        self.0
    }
}

/// Square matrix of similarity scores, higher meaning more similar.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix<I: IndexSpace> {
    scores: Array2<f32>,
    _space: PhantomData<I>,
}

pub type ContentMatrix = SimilarityMatrix<RowIndex>;
pub type CollaborativeMatrix = SimilarityMatrix<PivotIndex>;

impl<I: IndexSpace> SimilarityMatrix<I> {
    /// Wrap a score array. Rejects non-square shapes and NaN/infinite scores,
    /// which keeps ranking a total order.
    pub fn new(scores: Array2<f32>) -> Result<Self> {
        let (rows, cols) = scores.dim();
        if rows != cols {
            return Err(RecError::NotSquare { rows, cols });
        }
        if let Some(((row, col), _)) = scores.indexed_iter().find(|(_, s)| !s.is_finite()) {
            return Err(RecError::NonFiniteScore { row, col });
        }

        Ok(Self {
            scores,
            _space: PhantomData,
        })
    }

    /// Build from nested rows, as stored in snapshot files.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * n);
        for row in &rows {
            if row.len() != n {
                return Err(RecError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        let scores = Array2::from_shape_vec((n, n), flat).map_err(|_| RecError::NotSquare {
            rows: n,
            cols: n,
        })?;
        Self::new(scores)
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.scores.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Number of rows (equal to the number of columns).
    pub fn dim(&self) -> usize {
        self.scores.nrows()
    }

    pub fn row(&self, index: I) -> Option<ArrayView1<'_, f32>> {
        (index.position() < self.dim()).then(|| self.scores.row(index.position()))
    }

    pub fn score(&self, from: I, to: I) -> Option<f32> {
        self.scores.get((from.position(), to.position())).copied()
    }

    /// Row `index` as `(column, score)` pairs, highest score first.
    ///
    /// The sort is stable over column order, so equal scores keep the lower
    /// column first. The anchor itself is included; callers drop it.
    pub fn ranked(&self, index: I) -> Vec<(I, f32)> {
        let Some(row) = self.row(index) else {
            return Vec::new();
        };

        let mut pairs: Vec<(I, f32)> = row
            .iter()
            .enumerate()
            .map(|(col, &score)| (I::from_position(col), score))
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_non_square() {
        let err = ContentMatrix::new(Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, RecError::NotSquare { rows: 2, cols: 3 }));

        let err = ContentMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]).unwrap_err();
        assert!(matches!(err, RecError::NotSquare { .. }));
    }

    #[test]
    fn test_rejects_nan() {
        let err = CollaborativeMatrix::new(array![[1.0, f32::NAN], [0.0, 1.0]]).unwrap_err();
        assert!(matches!(err, RecError::NonFiniteScore { row: 0, col: 1 }));
    }

    #[test]
    fn test_ranked_descending_with_index_tiebreak() {
        let m = ContentMatrix::new(array![
            [1.0, 0.4, 0.7, 0.4],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let ranked: Vec<usize> = m.ranked(RowIndex(0)).iter().map(|(i, _)| i.0).collect();
        assert_eq!(ranked, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_ranked_reads_only_anchor_row() {
        // Asymmetric on purpose: row 1 must not be consulted for anchor 0.
        let m = CollaborativeMatrix::new(array![[1.0, 0.1, 0.9], [0.9, 1.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap();
        let ranked: Vec<usize> = m.ranked(PivotIndex(0)).iter().map(|(i, _)| i.0).collect();
        assert_eq!(ranked, vec![0, 2, 1]);
    }

    #[test]
    fn test_out_of_range_row_is_empty() {
        let m = ContentMatrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(m.ranked(RowIndex(5)).is_empty());
        assert_eq!(m.score(RowIndex(0), RowIndex(0)), Some(1.0));
        assert_eq!(m.score(RowIndex(0), RowIndex(1)), None);
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = vec![vec![1.0, 0.25], vec![0.5, 1.0]];
        let m = ContentMatrix::from_rows(rows.clone()).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.to_rows(), rows);
    }
}
