use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Matrix has no rows")]
    EmptyMatrix,
    #[error("Matrix row {0} has no columns")]
    EmptyRow(usize),
    #[error("Matrix row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Objective has {found} coefficients, expected {expected}")]
    ObjectiveLength { expected: usize, found: usize },
    #[error("Right-hand side has {found} entries, expected {expected}")]
    RhsLength { expected: usize, found: usize },
}

/// Checks that `matrix` is non-empty and rectangular, returning `(rows, columns)`.
pub fn dimensions(matrix: &[Vec<f64>]) -> Result<(usize, usize), ShapeError> {
    let first = matrix.first().ok_or(ShapeError::EmptyMatrix)?;
    let cols = first.len();
    if cols == 0 {
        return Err(ShapeError::EmptyRow(0));
    }

    for (row, values) in matrix.iter().enumerate().skip(1) {
        if values.len() != cols {
            return Err(ShapeError::RaggedRow {
                row,
                expected: cols,
                found: values.len(),
            });
        }
    }

    Ok((matrix.len(), cols))
}

/// Transpose an m×n matrix into an n×m one.
pub fn transpose(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ShapeError> {
    let (_, cols) = dimensions(matrix)?;
    Ok((0..cols)
        .map(|j| matrix.iter().map(|row| row[j]).collect())
        .collect())
}

pub fn negate_vector(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&v| -v).collect()
}

pub fn negate_matrix(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    matrix.iter().map(|row| negate_vector(row)).collect()
}
