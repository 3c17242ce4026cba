use crate::solution::Outcome;
use crate::tableau::{Tableau, VarId};

/// Label of the solution column.
pub const SOLUTION_COLUMN: &str = "S0";

/// Display names for variable ids and the objective row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    prefix: String,
    function: String,
    num_variables: usize,
}

impl Names {
    pub fn new(prefix: impl Into<String>, function: impl Into<String>, num_variables: usize) -> Self {
        Self {
            prefix: prefix.into(),
            function: function.into(),
            num_variables,
        }
    }

    /// `x1` for `VarId(0)`, numbering continues through the slack variables.
    pub fn variable(&self, var: VarId) -> String {
        format!("{}{}", self.prefix, var.0 + 1)
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Names of the decision variables, in readout order.
    pub fn decision_variables(&self) -> Vec<String> {
        (0..self.num_variables).map(|i| self.variable(VarId(i))).collect()
    }

    pub fn row_labels(&self, tableau: &Tableau) -> Vec<String> {
        tableau
            .basis()
            .iter()
            .map(|&var| self.variable(var))
            .chain(std::iter::once(self.function.clone()))
            .collect()
    }

    pub fn column_labels(&self, tableau: &Tableau) -> Vec<String> {
        std::iter::once(SOLUTION_COLUMN.to_string())
            .chain(tableau.nonbasic().iter().map(|&var| self.variable(var)))
            .collect()
    }
}

/// A read-only view of the engine after some number of pivots.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tableau: &'a Tableau,
    pub names: &'a Names,
    /// Pivots performed so far
    pub iteration: usize,
}

impl Snapshot<'_> {
    pub fn row_labels(&self) -> Vec<String> {
        self.names.row_labels(self.tableau)
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.names.column_labels(self.tableau)
    }

    pub fn to_record(&self) -> TableauRecord {
        TableauRecord {
            iteration: self.iteration,
            row_labels: self.row_labels(),
            column_labels: self.column_labels(),
            cells: self.tableau.cells().to_vec(),
        }
    }
}

/// Owned copy of a snapshot with display labels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableauRecord {
    pub iteration: usize,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

/// One completed pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PivotStep {
    /// 1-based count of this pivot
    pub iteration: usize,
    pub row: usize,
    pub column: usize,
    /// Variable that left the basis (previous row label)
    pub leaving: VarId,
    /// Variable that entered the basis (previous column label)
    pub entering: VarId,
    /// Pivot element before elimination
    pub element: f64,
}

/// Receives the engine state while a solve runs. All methods default to
/// doing nothing.
pub trait Reporter {
    /// The tableau as first built
    fn initial(&mut self, _snapshot: &Snapshot<'_>) {}

    fn pivot(&mut self, _step: &PivotStep, _snapshot: &Snapshot<'_>) {}

    /// The pivot loop reached a terminal state
    fn finished(&mut self, _outcome: &Outcome, _snapshot: &Snapshot<'_>) {}

    /// Solve was invoked on an already solved engine
    fn replayed(&mut self, outcome: &Outcome, snapshot: &Snapshot<'_>) {
        self.finished(outcome, snapshot);
    }
}

impl Reporter for () {}

/// Keeps a record of every reported tableau.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub tableaus: Vec<TableauRecord>,
    pub pivots: Vec<PivotStep>,
    pub outcomes: Vec<Outcome>,
    pub replays: usize,
}

impl Reporter for Recorder {
    fn initial(&mut self, snapshot: &Snapshot<'_>) {
        self.tableaus.push(snapshot.to_record());
    }

    fn pivot(&mut self, step: &PivotStep, snapshot: &Snapshot<'_>) {
        self.pivots.push(*step);
        self.tableaus.push(snapshot.to_record());
    }

    fn finished(&mut self, outcome: &Outcome, _snapshot: &Snapshot<'_>) {
        self.outcomes.push(outcome.clone());
    }

    fn replayed(&mut self, outcome: &Outcome, snapshot: &Snapshot<'_>) {
        self.replays += 1;
        self.finished(outcome, snapshot);
    }
}
