mod engine;
mod error;
#[cfg(test)]
mod fixtures;
pub mod matrix;
mod problem;
mod report;
mod solution;
mod tableau;

pub use engine::{Step, TableauEngine};
pub use error::{SolverError, SolverResult};
pub use matrix::ShapeError;
pub use problem::{Mode, Problem, Settings};
pub use report::{Names, PivotStep, Recorder, Reporter, SOLUTION_COLUMN, Snapshot, TableauRecord};
pub use solution::{Outcome, Readout, State, Status, substitute};
pub use tableau::{Tableau, VarId};
