//! # Beam Statics CLI
//!
//! ```text
//! beam_cli                       prompted single-beam demo
//! beam_cli <study.json> [--json] analyze every problem in a study file
//! beam_cli --example <path>      write a sample study file
//! ```
//!
//! Set `RUST_LOG=debug` to trace the analysis pipeline.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use beam_core::analysis::{analyze, AnalysisSummary};
use beam_core::beam::{Beam, BeamProblem, FixedEnd};
use beam_core::loads::{DistributedLoad, LoadFunction, PointLoad, PointMoment};
use beam_core::report;
use beam_core::settings::AnalysisSettings;
use beam_core::units::UnitSystem;
use beam_core::{load_study, save_study, BeamError, Study};

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return String::new();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => run_demo().map(|()| ExitCode::SUCCESS),
        [flag, path] if flag == "--example" => write_example(Path::new(path)).map(|()| ExitCode::SUCCESS),
        [path] => run_study(Path::new(path), false),
        [path, flag] if flag == "--json" => run_study(Path::new(path), true),
        _ => {
            eprintln!("Usage: beam_cli [<study.json> [--json] | --example <path>]");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(e: &BeamError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn run_demo() -> Result<(), BeamError> {
    println!("Beam Statics - simply supported demo");
    println!("====================================");
    println!();

    let length = prompt_f64("Enter beam length (m) [10.0]: ", 10.0);
    let position = prompt_f64(
        &format!("Enter point load position (m) [{}]: ", length / 2.0),
        length / 2.0,
    );
    let magnitude = prompt_f64("Enter point load, upward positive (N) [-100.0]: ", -100.0);
    let intensity = prompt_f64("Enter uniform load over full span, downward positive (N/m) [0.0]: ", 0.0);
    let expression = prompt_line("Enter extra load w(x) over full span, e.g. x*sin(x), downward positive [none]: ");

    let mut problem = BeamProblem::new("CLI-Demo", Beam::simply_supported(length))
        .with_point_load(PointLoad::vertical(position, magnitude));
    if intensity != 0.0 {
        problem = problem.with_distributed_load(DistributedLoad::uniform(0.0, length, intensity));
    }
    if !expression.is_empty() {
        problem = problem.with_distributed_load(DistributedLoad::new(
            0.0,
            length,
            LoadFunction::expression(expression)?,
        ));
    }

    let summary = analyze(&problem, &AnalysisSettings::default())?.summary()?;
    println!();
    print!("{}", report::render(&summary, UnitSystem::Metric));
    println!();
    println!("JSON Output:");
    print_json(&summary);
    Ok(())
}

/// Exits with failure when any problem in the study fails to analyze
fn run_study(path: &Path, json: bool) -> Result<ExitCode, BeamError> {
    let study = load_study(path)?;
    if report_study(&study, json) > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print every problem's report or JSON summary; returns the failure count
fn report_study(study: &Study, json: bool) -> usize {
    let units = study.settings.units;

    let mut summaries: Vec<AnalysisSummary> = Vec::new();
    let mut failures = 0;
    for (id, outcome) in study.analyze_all() {
        match outcome.and_then(|analysis| analysis.summary()) {
            Ok(summary) => {
                if !json {
                    print!("{}", report::render(&summary, units));
                    println!();
                }
                summaries.push(summary);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Problem {} failed:", id);
                print_error(&e);
            }
        }
    }

    if json {
        print_json(&summaries);
    }
    if failures > 0 {
        eprintln!("{} of {} problem(s) failed", failures, study.problem_count());
    }
    failures
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

fn write_example(path: &Path) -> Result<(), BeamError> {
    let mut study = Study::new("", "EXAMPLE");

    study.add_problem(
        BeamProblem::new("Simply supported, central load", Beam::simply_supported(10.0))
            .with_point_load(PointLoad::vertical(5.0, -100.0)),
    );
    study.add_problem(
        BeamProblem::new("Overhanging, uniform load", Beam::overhanging(6.0, 0.0, 6.0))
            .with_distributed_load(DistributedLoad::uniform(0.0, 6.0, 10.0)),
    );
    study.add_problem(
        BeamProblem::new("Cantilever, end load", Beam::cantilever(4.0, FixedEnd::Left))
            .with_point_load(PointLoad::vertical(4.0, -50.0)),
    );
    study.add_problem(
        BeamProblem::new("Overhang with mixed loads", Beam::overhanging(12.0, 2.0, 9.0))
            .with_point_load(PointLoad::vertical(12.0, -25.0))
            .with_point_load(PointLoad::horizontal(6.0, 15.0))
            .with_moment(PointMoment::new(4.0, 40.0))
            .with_distributed_load(DistributedLoad::new(2.0, 9.0, LoadFunction::linear(0.0, 2.0)))
            .with_distributed_load(DistributedLoad::new(
                0.0,
                12.0,
                LoadFunction::Sinusoidal {
                    amplitude: 3.0,
                    wavenumber: std::f64::consts::PI / 12.0,
                    phase: 0.0,
                },
            )),
    );
    study.add_problem(
        BeamProblem::new("Simply supported, expression load", Beam::simply_supported(8.0))
            .with_distributed_load(DistributedLoad::new(0.0, 8.0, LoadFunction::expression("3 + 2*exp(-x)*x")?)),
    );

    save_study(&study, path)?;
    println!("Wrote {} example problem(s) to {}", study.problem_count(), path.display());
    Ok(())
}
