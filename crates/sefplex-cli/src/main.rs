use clap::{Args, Parser, Subcommand};
use sefplex_solver::{IpSolution, Outcome, Solver, StandardForm};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod input;

/// Tolerance used when independently re-checking certificates
const VERIFY_TOLERANCE: f64 = 1e-6;

#[derive(Parser)]
#[command(name = "sefplex")]
#[command(about = "Two-phase simplex and cutting-plane solver for standard equality form programs", long_about = None)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a linear program with the two-phase simplex method
    Solve {
        /// JSON file with keys c, z, A, b (and optionally constraint_types)
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Re-check the returned certificate
        #[arg(long)]
        verify: bool,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Solve an integer program with cutting planes
    SolveIp {
        /// JSON file with keys c, z, A, b (and optionally constraint_types)
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Maximum number of cutting planes, 0 for no limit
        #[arg(long, default_value_t = 1000)]
        max_cuts: usize,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Check a program file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(Args)]
struct SolverArgs {
    /// Tolerance for floating point comparisons
    #[arg(long, default_value_t = 1e-9)]
    tolerance: f64,
    /// Maximum pivots per simplex run
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
}

impl SolverArgs {
    fn solver(&self) -> Solver {
        Solver::new()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
    }
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

    match cli.command {
        Commands::Solve {
            file,
            format,
            verify,
            solver,
        } => {
            let program = load_or_exit(&file);
            let outcome = match solver.solver().solve(&program.lp) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Solver error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                print_json(&outcome);
            } else {
                print_outcome(&outcome);
            }

            if verify {
                check_certificate(&program.lp, &outcome);
            }
        }
        Commands::SolveIp {
            file,
            format,
            max_cuts,
            solver,
        } => {
            let program = load_or_exit(&file);
            let max_cuts = (max_cuts > 0).then_some(max_cuts);
            let solver = solver.solver().with_max_cuts(max_cuts);

            // With constraint types only the declared variables must be integral.
            let result = match &program.problem {
                Some(problem) => solver.solve_ip_problem(problem),
                None => solver.solve_ip(&program.lp),
            };
            let solution = match result {
                Ok(solution) => solution,
                Err(e) => {
                    eprintln!("Solver error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                print_json(&solution);
            } else {
                print_ip_solution(&solution);
            }
        }
        Commands::Check { file } => {
            let program = load_or_exit(&file);
            println!("{} is valid", file.display());
            println!("  {} constraints", program.lp.num_rows());
            println!("  {} variables", program.num_variables);
            println!("  {} columns in equality form", program.lp.num_cols());
        }
    }
}

fn load_or_exit(file: &Path) -> input::LoadedProgram {
    match input::load(file) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    println!("Status: {}", outcome.status());
    match outcome {
        Outcome::Optimal(solution) => {
            println!("Optimal solution: {:?}", solution.bfs);
            println!("Optimal basis: {:?}", solution.basis);
            println!("Optimal value: {}", solution.value);
            println!("Certificate of optimality: {:?}", solution.certificate);
        }
        Outcome::Unbounded(solution) => {
            println!("Certificate of unboundedness:");
            println!("x = {:?}", solution.x);
            println!("d = {:?}", solution.direction);
        }
        Outcome::Infeasible(solution) => {
            println!("Certificate of infeasibility: {:?}", solution.certificate);
        }
    }
}

fn print_ip_solution(solution: &IpSolution) {
    print_outcome(&solution.outcome);
    println!("Cutting planes: {}", solution.cuts.len());
    match &solution.point {
        Some(point) => println!("Integral solution: {:?}", point),
        None => println!("No integral solution."),
    }
}

fn check_certificate(lp: &StandardForm, outcome: &Outcome) {
    if sefplex_solver::verify(lp, outcome, VERIFY_TOLERANCE) {
        println!("Certificate verified.");
    } else {
        eprintln!("Certificate check failed.");
        std::process::exit(1);
    }
}
