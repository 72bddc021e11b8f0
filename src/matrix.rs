//! A minimal row/column matrix for combining pairwise similarity scores
//!
//! `Matrix` is only used by the
//! [`SimilarityCombiner`](`crate::similarity::SimilarityCombiner`) trait.
//! It borrows a flat, row-major slice and does not verify that the slice
//! length matches the dimensions, so callers must ensure this.
use std::fmt::Debug;

/// A borrowed row-major matrix
pub struct Matrix<'a, T> {
    rows: usize,
    cols: usize,
    data: &'a [T],
}

impl<'a, T> Matrix<'a, T> {
    /// Creates a new `Matrix` over `data` with the given dimensions
    ///
    /// `data.len()` must equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: &'a [T]) -> Self {
        Self { rows, cols, data }
    }

    /// Returns `true` if the matrix contains no values
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Iterates the rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> {
        // `chunks` panics on 0, and a 0-column matrix has no rows anyway
        self.data.chunks(self.cols.max(1))
    }

    /// Iterates the columns
    ///
    /// A matrix without rows yields `cols` empty columns.
    pub fn cols(&self) -> impl Iterator<Item = Column<'a, T>> + '_ {
        (0..self.cols).map(|col| Column {
            iter: self.data.get(col..).unwrap_or_default().iter().step_by(self.cols),
        })
    }
}

impl<T: Debug> Debug for Matrix<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row:?}")?;
        }
        Ok(())
    }
}

/// An iterator over the values of a single column of a [`Matrix`]
pub struct Column<'a, T> {
    iter: std::iter::StepBy<std::slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Column<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
