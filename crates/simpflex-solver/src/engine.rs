use tracing::{debug, info};

use crate::error::{SolverError, SolverResult};
use crate::problem::{Problem, Settings};
use crate::report::{Names, PivotStep, Reporter, Snapshot};
use crate::solution::{Outcome, Readout, State, Status};
use crate::tableau::{ColumnChoice, Tableau, VarId};

/// Result of a single iteration
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pivoted(PivotStep),
    Finished(Outcome),
}

/// Tableau simplex engine for one problem.
///
/// The tableau is built at construction, after the dual transform when the
/// settings ask for it. [`TableauEngine::solve`] pivots until a terminal
/// state and later calls replay the recorded result.
#[derive(Debug, Clone)]
pub struct TableauEngine {
    settings: Settings,
    original: Problem,
    working: Problem,
    names: Names,
    tableau: Tableau,
    state: State,
    iterations: usize,
    outcome: Option<Outcome>,
}

impl TableauEngine {
    pub fn new(problem: Problem, settings: Settings) -> SolverResult<Self> {
        problem.validate()?;
        let working = problem.for_mode(settings.mode)?;
        let tableau = Tableau::new(&working);
        let names = Names::new(
            settings.variable_prefix.clone(),
            settings.function_name.clone(),
            working.num_variables(),
        );
        debug!(
            mode = %settings.mode,
            variables = working.num_variables(),
            constraints = working.num_constraints(),
            "built initial tableau"
        );

        Ok(Self {
            settings,
            original: problem,
            working,
            names,
            tableau,
            state: State::Running,
            iterations: 0,
            outcome: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The problem as supplied by the caller
    pub fn problem(&self) -> &Problem {
        &self.original
    }

    /// The problem the tableau was built from (the dual form in dual mode)
    pub fn working_problem(&self) -> &Problem {
        &self.working
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn optimal_found(&self) -> bool {
        self.state == State::Finished(Status::Optimal)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tableau: &self.tableau,
            names: &self.names,
            iteration: self.iterations,
        }
    }

    /// Decision variable values read off the current tableau.
    pub fn readout(&self) -> Readout {
        let values = (0..self.working.num_variables())
            .map(|i| self.tableau.value_of(VarId(i)))
            .collect();
        Readout::new(values, &self.original.objective, &self.working.objective)
    }

    /// Runs one iteration: a pivot, or the transition to a terminal state.
    /// On a finished engine this returns the recorded outcome again.
    pub fn step(&mut self) -> SolverResult<Step> {
        if let Some(outcome) = &self.outcome {
            return Ok(Step::Finished(outcome.clone()));
        }

        let column = match self.tableau.choose_column() {
            ColumnChoice::Pivot(column) => column,
            ColumnChoice::Optimal => return Ok(self.finish(Status::Optimal)),
            ColumnChoice::Infeasible => return Ok(self.finish(Status::Infeasible)),
            ColumnChoice::Unbounded => return Ok(self.finish(Status::Unbounded)),
        };

        if self.iterations >= self.settings.max_iterations {
            return Err(SolverError::IterationLimit(self.iterations));
        }

        let row = self.tableau.choose_row(column);
        let step = PivotStep {
            iteration: self.iterations + 1,
            row,
            column,
            leaving: self.tableau.basis()[row],
            entering: self.tableau.nonbasic()[column - 1],
            element: self.tableau.get(row, column),
        };
        self.tableau.pivot(row, column)?;
        self.iterations += 1;

        debug!(
            iteration = step.iteration,
            row,
            column,
            leaving = step.leaving.0,
            entering = step.entering.0,
            element = step.element,
            "pivot"
        );
        Ok(Step::Pivoted(step))
    }

    fn finish(&mut self, status: Status) -> Step {
        let outcome = Outcome {
            status,
            iterations: self.iterations,
            readout: self.readout(),
        };
        self.state = State::Finished(status);
        self.outcome = Some(outcome.clone());
        info!(?status, iterations = self.iterations, "simplex finished");
        Step::Finished(outcome)
    }

    /// Pivots until a terminal state, reporting the initial tableau, every
    /// pivot and the outcome. A solved engine only replays its outcome.
    pub fn solve<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> SolverResult<Outcome> {
        if let Some(outcome) = &self.outcome {
            debug!("already solved, replaying outcome");
            reporter.replayed(outcome, &self.snapshot());
            return Ok(outcome.clone());
        }

        if self.iterations == 0 {
            reporter.initial(&self.snapshot());
        }

        loop {
            match self.step()? {
                Step::Pivoted(step) => reporter.pivot(&step, &self.snapshot()),
                Step::Finished(outcome) => {
                    reporter.finished(&outcome, &self.snapshot());
                    return Ok(outcome);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::matrix::ShapeError;
    use crate::problem::Mode;
    use crate::report::Recorder;
    use approx::assert_relative_eq;

    #[test]
    fn test_primal_example() {
        let mut engine = TableauEngine::new(lab_1(), Settings::new()).unwrap();
        let outcome = engine.solve(&mut ()).unwrap();

        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.iterations, 3);
        let values = &outcome.readout.values;
        assert_relative_eq!(values[0], 9.0 / 19.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 24.0 / 19.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 35.0 / 19.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.readout.objective_value, 408.0 / 19.0, epsilon = 1e-9);
        assert_relative_eq!(
            engine.tableau().objective_cell(),
            -outcome.readout.objective_value,
            epsilon = 1e-9
        );
        assert!(engine.is_solved());
        assert!(engine.optimal_found());
    }

    #[test]
    fn test_dual_example() {
        let mut engine = TableauEngine::new(lab_2(), Settings::for_mode(Mode::Dual)).unwrap();
        let outcome = engine.solve(&mut ()).unwrap();

        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.iterations, 3);
        let values = &outcome.readout.values;
        assert_relative_eq!(values[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 4.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.readout.objective_value, 55.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(
            outcome.readout.transformed_objective_value,
            -55.0 / 3.0,
            epsilon = 1e-9
        );
        assert_eq!(
            engine.names().row_labels(engine.tableau()),
            vec!["y5", "y1", "y3", "G"]
        );
    }

    #[test]
    fn test_step_reports_pivot() {
        let mut engine = TableauEngine::new(lab_1(), Settings::new()).unwrap();
        let Step::Pivoted(step) = engine.step().unwrap() else {
            panic!("expected a pivot");
        };
        assert_eq!(step.iteration, 1);
        assert_eq!((step.row, step.column), (0, 1));
        assert_eq!(step.leaving, VarId(3));
        assert_eq!(step.entering, VarId(0));
        assert_eq!(step.element, 4.0);
        assert_eq!(engine.state(), State::Running);
    }

    #[test]
    fn test_infeasible_stops_without_pivots() {
        let problem = Problem::new(
            vec![1.0, 1.0],
            vec![vec![1.0, 2.0], vec![1.0, 1.0]],
            vec![4.0, -1.0],
        )
        .unwrap();
        let mut engine = TableauEngine::new(problem, Settings::new()).unwrap();
        let outcome = engine.solve(&mut ()).unwrap();

        assert_eq!(outcome.status, Status::Infeasible);
        assert_eq!(outcome.iterations, 0);
        assert!(engine.is_solved());
        assert!(!engine.optimal_found());
    }

    #[test]
    fn test_unbounded_is_reported() {
        let problem = Problem::new(vec![1.0, 1.0], vec![vec![-1.0, 1.0]], vec![1.0]).unwrap();
        let mut engine = TableauEngine::new(problem, Settings::new()).unwrap();
        let outcome = engine.solve(&mut ()).unwrap();
        assert_eq!(outcome.status, Status::Unbounded);
        assert!(!engine.optimal_found());
    }

    #[test]
    fn test_iteration_limit() {
        let mut engine =
            TableauEngine::new(lab_1(), Settings::new().with_max_iterations(1)).unwrap();
        assert_eq!(
            engine.solve(&mut ()),
            Err(SolverError::IterationLimit(1))
        );
        assert!(!engine.is_solved());
    }

    #[test]
    fn test_resolve_replays() {
        let mut engine = TableauEngine::new(lab_1(), Settings::new()).unwrap();
        let mut recorder = Recorder::default();
        let first = engine.solve(&mut recorder).unwrap();
        let tableau = engine.tableau().clone();

        let second = engine.solve(&mut recorder).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.tableau(), &tableau);
        assert_eq!(engine.iterations(), 3);
        assert_eq!(recorder.pivots.len(), 3);
        assert_eq!(recorder.replays, 1);
        assert_eq!(recorder.outcomes.len(), 2);
    }

    #[test]
    fn test_unvalidated_problem_is_rejected() {
        let problem = Problem {
            objective: vec![1.0],
            constraints: vec![vec![1.0]],
            rhs: vec![1.0, 2.0],
        };
        for mode in [Mode::Primal, Mode::Dual] {
            assert_eq!(
                TableauEngine::new(problem.clone(), Settings::for_mode(mode)).unwrap_err(),
                SolverError::Shape(ShapeError::RhsLength { expected: 1, found: 2 })
            );
        }
    }

    #[test]
    fn test_all_infinite_ratios_pivot_on_first_row() {
        // row 0 has a zero coefficient and row 1 a zero S0, so no ratio is finite
        let problem = Problem::new(vec![1.0], vec![vec![0.0], vec![1.0]], vec![1.0, 0.0]).unwrap();
        let mut engine = TableauEngine::new(problem, Settings::new()).unwrap();
        let before = engine.tableau().clone();

        assert_eq!(
            engine.solve(&mut ()),
            Err(SolverError::ZeroPivot { row: 0, column: 1 })
        );
        assert_eq!(engine.state(), State::Running);
        assert_eq!(engine.iterations(), 0);
        assert_eq!(engine.tableau(), &before);
        assert!(engine.outcome().is_none());
    }

    #[test]
    fn test_negative_pivot_element_on_first_row() {
        let problem = Problem::new(vec![1.0], vec![vec![-1.0], vec![1.0]], vec![1.0, 0.0]).unwrap();
        let mut engine =
            TableauEngine::new(problem, Settings::new().with_max_iterations(4)).unwrap();
        let initial = engine.tableau().clone();

        let Step::Pivoted(step) = engine.step().unwrap() else {
            panic!("expected a pivot");
        };
        assert_eq!((step.row, step.column), (0, 1));
        assert_eq!(step.element, -1.0);
        assert_eq!(engine.tableau().get(0, 0), -1.0);

        // the repair pivot on row 0 restores the initial tableau, so the loop cycles
        assert!(matches!(engine.step().unwrap(), Step::Pivoted(_)));
        assert_eq!(engine.tableau(), &initial);
        assert_eq!(engine.solve(&mut ()), Err(SolverError::IterationLimit(4)));
    }
}
