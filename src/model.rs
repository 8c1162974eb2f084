//! Data types exchanged with the simulator.
use std::fmt;

use thiserror::Error;

/// A dipole source in simulator space: x, y, z components in simulator units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl DipoleVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for DipoleVector {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<DipoleVector> for [f64; 3] {
    fn from(value: DipoleVector) -> Self {
        [value.x, value.y, value.z]
    }
}

impl fmt::Display for DipoleVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {found} values, expected {expected}")]
pub struct ShapeError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// A rows × cols table of doubles stored row-major, the layout the simulator
/// uses for probe, TMP and BSP tables.
///
/// A `Matrix` is consistent by construction: `values.len()` always equals
/// `rows * cols`, so serialization can trust the declared dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from per-row value lists, rejecting ragged input.
    ///
    /// The column count is taken from the first row; an empty input is a
    /// valid 0 × 0 matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ShapeError {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    /// Assembles a matrix from already-validated row-major values.
    pub(crate) fn from_raw(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Self { rows, cols, values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All values in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        Some(&self.values[index * self.cols..(index + 1) * self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(|index| &self.values[index * self.cols..(index + 1) * self.cols])
    }

    pub fn at(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.cols {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_keeps_row_major_order() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1).unwrap(), &[3.0, 4.0]);
        assert_eq!(m.at(2, 0), Some(5.0));
        assert_eq!(m.iter_rows().count(), 3);
        assert_eq!(m.iter_rows().last().unwrap(), &[5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_matrix_has_no_dimensions() {
        let m = Matrix::from_rows(Vec::new()).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
        assert!(m.is_empty());
        assert_eq!(m.row(0), None);
        assert_eq!(m.at(0, 0), None);
    }

    #[test]
    fn out_of_bounds_access_is_none() {
        let m = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        assert_eq!(m.row(1), None);
        assert_eq!(m.at(0, 1), None);
    }

    #[test]
    fn dipole_vector_converts_to_and_from_arrays() {
        let v = DipoleVector::from([0.1, -0.2, 0.3]);
        assert_eq!(v, DipoleVector::new(0.1, -0.2, 0.3));
        let array: [f64; 3] = v.into();
        assert_eq!(array, [0.1, -0.2, 0.3]);
        assert_eq!(v.to_string(), "(0.1, -0.2, 0.3)");
    }
}
