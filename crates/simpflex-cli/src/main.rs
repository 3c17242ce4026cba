mod printer;

use clap::{Parser, ValueEnum};
use simpflex_solver::{Mode, Problem, Reporter, Settings, SolverError, TableauEngine};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::printer::{JsonPrinter, TextPrinter, print_problem};

#[derive(Parser)]
#[command(name = "simpflex")]
#[command(about = "Solve the laboratory LP problems with the tableau simplex method", long_about = None)]
struct Cli {
    /// Which problem to solve
    #[arg(value_enum, default_value_t = Example::All)]
    example: Example,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Decimal places shown in tables and checks
    #[arg(short, long, default_value_t = 2)]
    precision: usize,
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Example {
    /// Laboratory work 1: the primal problem
    Primal,
    /// Laboratory work 2: the dual problem
    Dual,
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

struct Lab {
    title: &'static str,
    problem: Problem,
    settings: Settings,
}

fn primal_lab() -> Result<Lab, SolverError> {
    Ok(Lab {
        title: "Laboratory work 1: simplex method for the primal LP problem",
        problem: Problem::new(
            vec![6.0, 6.0, 6.0],
            vec![
                vec![4.0, 1.0, 1.0],
                vec![1.0, 2.0, 0.0],
                vec![0.0, 0.5, 4.0],
            ],
            vec![5.0, 3.0, 8.0],
        )?,
        settings: Settings::for_mode(Mode::Primal),
    })
}

fn dual_lab() -> Result<Lab, SolverError> {
    Ok(Lab {
        title: "Laboratory work 2: simplex method for the dual LP problem",
        problem: Problem::new(
            vec![3.0, 3.0, 7.0],
            vec![
                vec![1.0, 1.0, 1.0],
                vec![1.0, 4.0, 0.0],
                vec![0.0, 0.5, 3.0],
            ],
            vec![3.0, 5.0, 7.0],
        )?,
        settings: Settings::for_mode(Mode::Dual),
    })
}

fn run(lab: Lab, cli: &Cli) -> Result<(), SolverError> {
    let objective = lab.problem.objective.clone();
    let mode = lab.settings.mode;
    let mut engine = TableauEngine::new(lab.problem, lab.settings)?;

    let mut reporter: Box<dyn Reporter> = match cli.format {
        Format::Text => {
            println!("{}", lab.title);
            println!();
            println!("Input data:");
            print_problem(engine.problem(), "");
            match mode {
                Mode::Primal => println!("Solving the primal linear programming problem.\n"),
                Mode::Dual => {
                    println!("Solving the dual linear programming problem.\n");
                    println!("Transformed data:");
                    print_problem(engine.working_problem(), "'");
                }
            }
            Box::new(TextPrinter::new(objective, cli.precision))
        }
        Format::Json => Box::new(JsonPrinter::new(mode.to_string())),
    };

    engine.solve(reporter.as_mut())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let labs = match cli.example {
        Example::Primal => vec![primal_lab()],
        Example::Dual => vec![dual_lab()],
        Example::All => vec![primal_lab(), dual_lab()],
    };

    for lab in labs {
        let result = lab.and_then(|lab| run(lab, &cli));
        if let Err(e) = result {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    }
}
