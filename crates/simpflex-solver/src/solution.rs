/// How a finished solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    /// The objective row has no positive entry left
    Optimal,
    /// A row with negative S0 cannot be repaired
    Infeasible,
    /// The entering column has no positive constraint entry
    Unbounded,
}

/// Lifecycle of the pivot loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum State {
    Running,
    Finished(Status),
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Finished(_))
    }
}

/// Values read off the final tableau
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Readout {
    /// Value of each decision variable, zero when non-basic
    pub values: Vec<f64>,
    /// Substitution of `values` into the caller's objective coefficients
    pub objective_value: f64,
    /// Substitution of `values` into the objective the tableau maximized
    pub transformed_objective_value: f64,
}

impl Readout {
    pub(crate) fn new(values: Vec<f64>, objective: &[f64], transformed: &[f64]) -> Self {
        let objective_value = substitute(objective, &values);
        let transformed_objective_value = substitute(transformed, &values);
        Self {
            values,
            objective_value,
            transformed_objective_value,
        }
    }
}

/// `Σ c_k * v_k` over the common prefix of both slices.
pub fn substitute(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients.iter().zip(values).map(|(c, v)| c * v).sum()
}

/// The result of a finished solve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub status: Status,
    /// Pivots performed
    pub iterations: usize,
    pub readout: Readout,
}

impl Outcome {
    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }
}
