use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;
use crate::matrix::{self, ShapeError};

/// Which linear program the engine solves for the supplied data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Data is used as given
    #[default]
    Primal,
    /// Data is transformed into its dual before the tableau is built
    Dual,
}

impl FromStr for Mode {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ПЗ ЛП" => return Ok(Mode::Primal),
            "ДЗ ЛП" => return Ok(Mode::Dual),
            _ => {}
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "primal" => Ok(Mode::Primal),
            "dual" => Ok(Mode::Dual),
            _ => Err(SolverError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Primal => write!(f, "primal"),
            Mode::Dual => write!(f, "dual"),
        }
    }
}

/// Maximize `c·x` subject to `A·x <= b`, `x >= 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    /// Objective coefficients, one per variable
    pub objective: Vec<f64>,
    /// Constraint matrix, one row per constraint
    pub constraints: Vec<Vec<f64>>,
    /// Right-hand side, one entry per constraint
    pub rhs: Vec<f64>,
}

impl Problem {
    /// Builds a problem after checking that `objective`, `constraints` and
    /// `rhs` agree on `m` and `n`.
    pub fn new(
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        let problem = Self {
            objective,
            constraints,
            rhs,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Checks the shape invariants, returning `(m, n)`.
    pub fn validate(&self) -> Result<(usize, usize), ShapeError> {
        let (m, n) = matrix::dimensions(&self.constraints)?;
        if self.objective.len() != n {
            return Err(ShapeError::ObjectiveLength {
                expected: n,
                found: self.objective.len(),
            });
        }
        if self.rhs.len() != m {
            return Err(ShapeError::RhsLength {
                expected: m,
                found: self.rhs.len(),
            });
        }
        Ok((m, n))
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    /// The dual form fed to the tableau: `c' = -b`, `b' = -c`, `A' = -Aᵀ`.
    ///
    /// The result has `num_constraints` variables and `num_variables`
    /// constraints.
    pub fn dual(&self) -> Result<Self, ShapeError> {
        let transposed = matrix::transpose(&self.constraints)?;
        Ok(Self {
            objective: matrix::negate_vector(&self.rhs),
            constraints: matrix::negate_matrix(&transposed),
            rhs: matrix::negate_vector(&self.objective),
        })
    }

    /// The problem the tableau is built from in `mode`.
    pub fn for_mode(&self, mode: Mode) -> Result<Self, ShapeError> {
        self.validate()?;
        match mode {
            Mode::Primal => Ok(self.clone()),
            Mode::Dual => self.dual(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    /// Prefix of every variable name, `x` gives `x1, x2, ...`
    pub variable_prefix: String,
    /// Label of the objective row
    pub function_name: String,
    /// Pivots allowed before the solve is abandoned
    pub max_iterations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Primal,
            variable_prefix: "x".to_string(),
            function_name: "F".to_string(),
            max_iterations: 1000,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings for `mode`, naming dual variables `y` and the dual
    /// objective `G`.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Primal => Self::default(),
            Mode::Dual => Self::default()
                .with_mode(Mode::Dual)
                .with_variable_prefix("y")
                .with_function_name("G"),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }

    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = name.into();
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}
