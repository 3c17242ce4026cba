use simpflex_solver::{Outcome, PivotStep, Problem, Reporter, Snapshot, Status, VarId, substitute};
use tabled::builder::Builder;
use tabled::settings::{Alignment, Style};

/// Round to `precision` decimals, folding `-0` into `0`.
pub fn round(value: f64, precision: usize) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale + 0.0
}

pub fn format_vector(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

pub fn format_matrix(matrix: &[Vec<f64>]) -> String {
    let rows: Vec<String> = matrix.iter().map(|row| format_vector(row)).collect();
    format!("[{}]", rows.join(", "))
}

pub fn print_problem(problem: &Problem, suffix: &str) {
    println!("c{suffix} = {}", format_vector(&problem.objective));
    println!("A{suffix} = {}", format_matrix(&problem.constraints));
    println!("b{suffix} = {}", format_vector(&problem.rhs));
    println!();
}

/// Renders a bordered table, the first column holding the row labels.
pub fn render_table(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::ascii()).with(Alignment::center());
    table.to_string()
}

/// Prints every tableau the engine reports, the pivot swaps and a
/// substitution check after each pivot.
pub struct TextPrinter {
    /// Coefficients used in the substitution check
    coefficients: Vec<f64>,
    precision: usize,
}

impl TextPrinter {
    pub fn new(coefficients: Vec<f64>, precision: usize) -> Self {
        Self {
            coefficients,
            precision,
        }
    }

    fn print_table(&self, snapshot: &Snapshot<'_>) {
        let mut header = vec![String::new()];
        header.extend(snapshot.column_labels());

        let rows: Vec<Vec<String>> = snapshot
            .row_labels()
            .into_iter()
            .zip(snapshot.tableau.cells())
            .map(|(label, cells)| {
                std::iter::once(label)
                    .chain(cells.iter().map(|&v| round(v, self.precision).to_string()))
                    .collect()
            })
            .collect();

        println!("{}", render_table(header, rows));
    }

    fn print_check(&self, snapshot: &Snapshot<'_>) {
        let names = snapshot.names.decision_variables();
        let values: Vec<f64> = (0..names.len())
            .map(|i| round(snapshot.tableau.value_of(VarId(i)), self.precision))
            .collect();

        let assignments: Vec<String> = names
            .iter()
            .zip(&values)
            .map(|(name, value)| format!("{name} = {value}"))
            .collect();
        let symbolic: Vec<String> = self
            .coefficients
            .iter()
            .zip(&names)
            .map(|(c, name)| format!("{c}*{name}"))
            .collect();
        let numeric: Vec<String> = self
            .coefficients
            .iter()
            .zip(&values)
            .map(|(c, value)| format!("{c}*{value}"))
            .collect();
        let total = round(substitute(&self.coefficients, &values), self.precision);

        println!("Check with rounded values {}:", assignments.join(", "));
        println!(
            "{} = {} = {} = {}",
            snapshot.names.function(),
            symbolic.join(" + ").replace("+ -", "- "),
            numeric.join(" + ").replace("+ -", "- "),
            total
        );
    }

    fn print_status(&self, outcome: &Outcome) {
        match outcome.status {
            Status::Optimal => println!("Optimal solution found."),
            Status::Infeasible => println!("The system has no optimal solution."),
            Status::Unbounded => println!("The objective is unbounded."),
        }
        println!();
    }
}

impl Reporter for TextPrinter {
    fn initial(&mut self, snapshot: &Snapshot<'_>) {
        println!("Initial simplex tableau:");
        self.print_table(snapshot);
        println!();
    }

    fn pivot(&mut self, step: &PivotStep, snapshot: &Snapshot<'_>) {
        println!(
            "Swapping pivot row and column: {} and {}.",
            snapshot.names.variable(step.leaving),
            snapshot.names.variable(step.entering)
        );
        self.print_table(snapshot);
        self.print_check(snapshot);
        println!();
    }

    fn finished(&mut self, outcome: &Outcome, _snapshot: &Snapshot<'_>) {
        self.print_status(outcome);
    }

    fn replayed(&mut self, outcome: &Outcome, snapshot: &Snapshot<'_>) {
        println!("The problem was already solved:");
        self.print_table(snapshot);
        self.print_check(snapshot);
        self.print_status(outcome);
    }
}

/// Writes one JSON object per reported event.
pub struct JsonPrinter {
    /// Name of the problem the events belong to
    problem: String,
}

impl JsonPrinter {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
        }
    }

    fn emit(&self, event: serde_json::Value) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error serializing event: {}", e),
        }
    }
}

impl Reporter for JsonPrinter {
    fn initial(&mut self, snapshot: &Snapshot<'_>) {
        self.emit(serde_json::json!({
            "problem": self.problem,
            "event": "initial",
            "tableau": snapshot.to_record(),
        }));
    }

    fn pivot(&mut self, step: &PivotStep, snapshot: &Snapshot<'_>) {
        self.emit(serde_json::json!({
            "problem": self.problem,
            "event": "pivot",
            "step": step,
            "tableau": snapshot.to_record(),
        }));
    }

    fn finished(&mut self, outcome: &Outcome, snapshot: &Snapshot<'_>) {
        self.emit(serde_json::json!({
            "problem": self.problem,
            "event": "finished",
            "variables": snapshot.names.decision_variables(),
            "outcome": outcome,
        }));
    }
}
