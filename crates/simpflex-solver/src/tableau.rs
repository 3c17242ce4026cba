use tracing::trace;

use crate::error::{SolverError, SolverResult};
use crate::problem::Problem;

/// Identifies a variable: ids `0..n` are the decision variables, `n..n + m`
/// the slack variables of the constraint rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(pub usize);

/// Outcome of the column search for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnChoice {
    /// Pivot on this column (1-based, column 0 is S0)
    Pivot(usize),
    /// A row with negative S0 has no negative coefficient
    Infeasible,
    /// No positive entry left in the objective row
    Optimal,
    /// The entering column has no positive constraint entry
    Unbounded,
}

/// Dense simplex tableau with `m + 1` rows and `n + 1` columns.
///
/// Column 0 is the solution column S0 and row `m` is the objective row.
/// `basis[i]` is the variable of constraint row `i`, `nonbasic[j - 1]` the
/// variable of column `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    cells: Vec<Vec<f64>>,
    basis: Vec<VarId>,
    nonbasic: Vec<VarId>,
    in_basis: Vec<bool>,
}

impl Tableau {
    pub fn new(problem: &Problem) -> Self {
        let n = problem.num_variables();
        let m = problem.num_constraints();

        let mut cells = Vec::with_capacity(m + 1);
        for (row, &b) in problem.constraints.iter().zip(&problem.rhs) {
            let mut cells_row = Vec::with_capacity(n + 1);
            cells_row.push(b);
            cells_row.extend_from_slice(row);
            cells.push(cells_row);
        }
        let mut objective_row = Vec::with_capacity(n + 1);
        objective_row.push(0.0);
        objective_row.extend_from_slice(&problem.objective);
        cells.push(objective_row);

        let mut in_basis = vec![false; n + m];
        in_basis[n..].fill(true);

        Self {
            cells,
            basis: (n..n + m).map(VarId).collect(),
            nonbasic: (0..n).map(VarId).collect(),
            in_basis,
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.basis.len()
    }

    pub fn num_variables(&self) -> usize {
        self.nonbasic.len()
    }

    pub fn cells(&self) -> &[Vec<f64>] {
        &self.cells
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[row][column]
    }

    /// Variables labelling the constraint rows, in row order.
    pub fn basis(&self) -> &[VarId] {
        &self.basis
    }

    /// Variables labelling columns `1..=n`, in column order.
    pub fn nonbasic(&self) -> &[VarId] {
        &self.nonbasic
    }

    pub fn is_basic(&self, var: VarId) -> bool {
        self.in_basis.get(var.0).copied().unwrap_or(false)
    }

    /// Current value of `var`: its S0 entry if basic, zero otherwise.
    pub fn value_of(&self, var: VarId) -> f64 {
        if !self.is_basic(var) {
            return 0.0;
        }
        self.basis
            .iter()
            .position(|&v| v == var)
            .map_or(0.0, |row| self.cells[row][0])
    }

    /// S0 entry of the objective row, the negated objective value.
    pub fn objective_cell(&self) -> f64 {
        self.cells[self.num_constraints()][0]
    }

    /// Every variable id appears exactly once among the row and column
    /// labels, and `in_basis` agrees with the row labels.
    pub fn labels_are_consistent(&self) -> bool {
        let total = self.in_basis.len();
        let mut seen = vec![0u8; total];
        for var in self.basis.iter().chain(&self.nonbasic) {
            match seen.get_mut(var.0) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        seen.iter().all(|&count| count == 1)
            && self.basis.iter().all(|&v| self.in_basis[v.0])
            && self.nonbasic.iter().all(|&v| !self.in_basis[v.0])
    }

    /// Picks the pivot column, repairing negative S0 entries before
    /// consulting the objective row.
    pub(crate) fn choose_column(&self) -> ColumnChoice {
        match self.repair_column() {
            Some(choice) => choice,
            None => self.entering_column(),
        }
    }

    /// Phase A. `None` when no constraint row has a negative S0 entry.
    fn repair_column(&self) -> Option<ColumnChoice> {
        let m = self.num_constraints();
        let rows = &self.cells[..m];
        let min_s0 = rows.iter().map(|row| row[0]).fold(f64::INFINITY, f64::min);
        if min_s0 >= 0.0 {
            return None;
        }

        let mut column = None;
        for (i, row) in rows.iter().enumerate() {
            if row[0] >= 0.0 {
                continue;
            }
            let (offset, min_in_row) = first_min(&row[1..]);
            if min_in_row >= 0.0 {
                trace!(row = i, "negative S0 with no negative coefficient");
                return Some(ColumnChoice::Infeasible);
            }
            if row[0] == min_s0 {
                column = Some(offset + 1);
            }
        }

        // min_s0 is attained by some negative row, so a column was recorded
        column.map(|c| {
            trace!(column = c, min_s0, "repairing negative S0");
            ColumnChoice::Pivot(c)
        })
    }

    /// Phase B: the smallest strictly positive objective-row entry.
    fn entering_column(&self) -> ColumnChoice {
        let m = self.num_constraints();
        let mut best: Option<(usize, f64)> = None;
        for (j, &value) in self.cells[m].iter().enumerate().skip(1) {
            if value > 0.0 && best.is_none_or(|(_, min)| value < min) {
                best = Some((j, value));
            }
        }

        let Some((column, _)) = best else {
            return ColumnChoice::Optimal;
        };
        if self.cells[..m].iter().all(|row| row[column] <= 0.0) {
            return ColumnChoice::Unbounded;
        }
        trace!(column, "entering from objective row");
        ColumnChoice::Pivot(column)
    }

    /// Ratio test on `column`.
    ///
    /// Rows with a zero coefficient, a zero S0 entry, or a non-positive
    /// quotient never win. When every ratio is infinite the first row is
    /// returned.
    pub(crate) fn choose_row(&self, column: usize) -> usize {
        let m = self.num_constraints();
        let mut best = (0, f64::INFINITY);
        for (i, row) in self.cells[..m].iter().enumerate() {
            let (b, a) = (row[0], row[column]);
            let ratio = if a != 0.0 && b != 0.0 && b / a > 0.0 {
                b / a
            } else {
                f64::INFINITY
            };
            if ratio < best.1 {
                best = (i, ratio);
            }
        }
        best.0
    }

    /// Swaps the labels at (`row`, `column`) and recomputes every cell from
    /// the pre-pivot values.
    pub(crate) fn pivot(&mut self, row: usize, column: usize) -> SolverResult<()> {
        let p = self.cells[row][column];
        if p == 0.0 {
            return Err(SolverError::ZeroPivot { row, column });
        }

        let leaving = self.basis[row];
        let entering = self.nonbasic[column - 1];
        self.basis[row] = entering;
        self.nonbasic[column - 1] = leaving;
        self.in_basis[entering.0] = true;
        self.in_basis[leaving.0] = false;

        let old = &self.cells;
        let pivot_row = &old[row];
        let next: Vec<Vec<f64>> = old
            .iter()
            .enumerate()
            .map(|(r, cells_row)| {
                cells_row
                    .iter()
                    .enumerate()
                    .map(|(c, &value)| match (r == row, c == column) {
                        (true, true) => 1.0 / p,
                        (true, false) => value / p,
                        (false, true) => -value / p,
                        (false, false) => value - pivot_row[c] * cells_row[column] / p,
                    })
                    .collect()
            })
            .collect();
        self.cells = next;
        Ok(())
    }
}

/// Index and value of the first minimum of a non-empty slice.
fn first_min(values: &[f64]) -> (usize, f64) {
    let mut best = (0, values[0]);
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value < best.1 {
            best = (i, value);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_layout() {
        let tableau = Tableau::new(&lab_1());
        assert_eq!(tableau.cells()[0], vec![5.0, 4.0, 1.0, 1.0]);
        assert_eq!(tableau.cells()[2], vec![8.0, 0.0, 0.5, 4.0]);
        assert_eq!(tableau.cells()[3], vec![0.0, 6.0, 6.0, 6.0]);
        assert_eq!(tableau.basis(), &[VarId(3), VarId(4), VarId(5)]);
        assert_eq!(tableau.nonbasic(), &[VarId(0), VarId(1), VarId(2)]);
        assert!(tableau.labels_are_consistent());
    }

    #[test]
    fn test_smallest_positive_objective_entry_enters() {
        let problem = Problem::new(
            vec![5.0, 2.0, 9.0],
            vec![vec![1.0, 1.0, 1.0]],
            vec![4.0],
        )
        .unwrap();
        let tableau = Tableau::new(&problem);
        assert_eq!(tableau.choose_column(), ColumnChoice::Pivot(2));
    }

    #[test]
    fn test_equal_objective_entries_pick_first() {
        let tableau = Tableau::new(&lab_1());
        assert_eq!(tableau.choose_column(), ColumnChoice::Pivot(1));
    }

    #[test]
    fn test_optimal_when_objective_row_non_positive() {
        let problem = Problem::new(vec![-1.0, 0.0], vec![vec![1.0, 1.0]], vec![2.0]).unwrap();
        assert_eq!(Tableau::new(&problem).choose_column(), ColumnChoice::Optimal);
    }

    #[test]
    fn test_unbounded_column() {
        let problem = Problem::new(vec![1.0, 0.0], vec![vec![-1.0, 1.0]], vec![2.0]).unwrap();
        assert_eq!(
            Tableau::new(&problem).choose_column(),
            ColumnChoice::Unbounded
        );
    }

    #[test]
    fn test_repair_picks_most_negative_row() {
        let problem = Problem::new(
            vec![1.0, 1.0, 1.0],
            vec![
                vec![-1.0, -2.0, 0.0],
                vec![-1.0, 0.0, -3.0],
            ],
            vec![-1.0, -5.0],
        )
        .unwrap();
        // row 1 holds the most negative S0, its minimum sits in column 3
        assert_eq!(Tableau::new(&problem).choose_column(), ColumnChoice::Pivot(3));
    }

    #[test]
    fn test_repair_last_matching_row_wins() {
        let problem = Problem::new(
            vec![1.0, 1.0],
            vec![vec![-2.0, -1.0], vec![-1.0, -3.0]],
            vec![-4.0, -4.0],
        )
        .unwrap();
        assert_eq!(Tableau::new(&problem).choose_column(), ColumnChoice::Pivot(2));
    }

    #[test]
    fn test_repair_detects_infeasible_row() {
        let problem = Problem::new(
            vec![1.0, 1.0],
            vec![vec![-1.0, -1.0], vec![0.0, 2.0]],
            vec![-3.0, -1.0],
        )
        .unwrap();
        assert_eq!(
            Tableau::new(&problem).choose_column(),
            ColumnChoice::Infeasible
        );
    }

    #[test]
    fn test_ratio_test_skips_zero_rhs_and_negative_ratios() {
        let problem = Problem::new(
            vec![1.0],
            vec![vec![1.0], vec![-1.0], vec![2.0], vec![1.0]],
            vec![0.0, 3.0, 6.0, 4.0],
        )
        .unwrap();
        // ratios: inf (b = 0), inf (negative), 3, 4
        assert_eq!(Tableau::new(&problem).choose_row(1), 2);
    }

    #[test]
    fn test_ratio_ties_pick_first_row() {
        let problem = Problem::new(vec![1.0], vec![vec![2.0], vec![1.0]], vec![4.0, 2.0]).unwrap();
        assert_eq!(Tableau::new(&problem).choose_row(1), 0);
    }

    #[test]
    fn test_pivot_recomputes_from_snapshot() {
        let mut tableau = Tableau::new(&lab_1());
        tableau.pivot(0, 1).unwrap();

        let expected = [
            [1.25, 0.25, 0.25, 0.25],
            [1.75, -0.25, 1.75, -0.25],
            [8.0, 0.0, 0.5, 4.0],
            [-7.5, -1.5, 4.5, 4.5],
        ];
        for (row, want) in tableau.cells().iter().zip(expected) {
            for (&got, want) in row.iter().zip(want) {
                assert_relative_eq!(got, want, epsilon = 1e-12);
            }
        }
        assert_eq!(tableau.basis()[0], VarId(0));
        assert_eq!(tableau.nonbasic()[0], VarId(3));
        assert!(tableau.is_basic(VarId(0)));
        assert!(!tableau.is_basic(VarId(3)));
        assert!(tableau.labels_are_consistent());
    }

    #[test]
    fn test_zero_pivot_is_rejected() {
        let mut tableau = Tableau::new(&lab_1());
        let before = tableau.clone();
        assert_eq!(
            tableau.pivot(2, 1),
            Err(SolverError::ZeroPivot { row: 2, column: 1 })
        );
        assert_eq!(tableau, before);
    }

    #[test]
    fn test_value_of_nonbasic_is_zero() {
        let mut tableau = Tableau::new(&lab_1());
        tableau.pivot(0, 1).unwrap();
        assert_relative_eq!(tableau.value_of(VarId(0)), 1.25);
        assert_eq!(tableau.value_of(VarId(1)), 0.0);
        assert_relative_eq!(tableau.value_of(VarId(4)), 1.75);
    }
}
