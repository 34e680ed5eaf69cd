//! End-to-end checks of the analysis pipeline on reference beams.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use num::Zero;

use beam_core::analysis::{analyze, BeamAnalysis, ReactionKind};
use beam_core::beam::{Beam, BeamProblem, FixedEnd};
use beam_core::loads::{DistributedLoad, LoadFunction, PointLoad, PointMoment};
use beam_core::settings::AnalysisSettings;
use beam_core::BeamError;

fn run(problem: &BeamProblem) -> BeamAnalysis {
    analyze(problem, &AnalysisSettings::default()).unwrap()
}

fn mixed_overhang() -> BeamProblem {
    BeamProblem::new("mixed", Beam::overhanging(12.0, 2.0, 9.0))
        .with_point_load(PointLoad::vertical(12.0, -25.0))
        .with_point_load(PointLoad::vertical(5.5, -40.0))
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
        ))
}

#[test]
fn simply_supported_central_point_load() {
    let problem = BeamProblem::new("S1", Beam::simply_supported(10.0))
        .with_point_load(PointLoad::vertical(5.0, -100.0));
    let analysis = run(&problem);

    assert_eq!(analysis.reaction(ReactionKind::PinVertical), Some(50.0));
    assert_eq!(analysis.reaction(ReactionKind::RollerVertical), Some(50.0));
    assert_eq!(analysis.reaction(ReactionKind::PinHorizontal), Some(0.0));
    assert_abs_diff_eq!(analysis.moment_at(5.0).unwrap(), 250.0, epsilon = 1e-9);
}

#[test]
fn overhanging_uniform_load() {
    let problem = BeamProblem::new("S2", Beam::overhanging(6.0, 0.0, 6.0))
        .with_distributed_load(DistributedLoad::uniform(0.0, 6.0, 10.0));
    let analysis = run(&problem);

    assert_eq!(analysis.reaction(ReactionKind::RollerVertical), Some(30.0));
    assert_eq!(analysis.reaction(ReactionKind::PinVertical), Some(30.0));
    let residuals = analysis.equilibrium_residuals();
    assert!(residuals.iter().all(|r| r.is_zero()));
    assert_abs_diff_eq!(analysis.moment_at(3.0).unwrap(), 45.0, epsilon = 1e-9);
}

#[test]
fn cantilever_end_load() {
    let length = 4.0;
    let problem = BeamProblem::new("S3", Beam::cantilever(length, FixedEnd::Left))
        .with_point_load(PointLoad::vertical(length, -50.0));
    let analysis = run(&problem);

    assert_eq!(analysis.reaction(ReactionKind::FixedVertical), Some(50.0));
    assert_eq!(analysis.reaction(ReactionKind::FixedMoment), Some(50.0 * length));

    // Linear between −50·L at the support and 0 at the free end
    for x in [0.5, 1.0, 2.0, 3.0, 3.5] {
        assert_abs_diff_eq!(analysis.moment_at(x).unwrap(), 50.0 * (x - length), epsilon = 1e-9);
    }
    assert_abs_diff_eq!(analysis.moment_at(length).unwrap(), 0.0, epsilon = 1e-9);

    let moment = analysis.diagrams().unwrap().moment;
    assert_abs_diff_eq!(moment.peak.value, -50.0 * length, epsilon = 1e-9);
    assert_eq!(moment.peak.position, 0.0);
}

#[test]
fn cantilever_fixed_on_the_right() {
    let problem = BeamProblem::new("CR", Beam::cantilever(5.0, FixedEnd::Right))
        .with_point_load(PointLoad::vertical(0.0, -10.0))
        .with_distributed_load(DistributedLoad::uniform(0.0, 5.0, 2.0));
    let analysis = run(&problem);

    assert_eq!(analysis.reaction(ReactionKind::FixedVertical), Some(20.0));
    // ΣM about 0: 5·20 + M_R = 0 + ∫2x dx = 25
    assert_eq!(analysis.reaction(ReactionKind::FixedMoment), Some(-75.0));
    // Hogging just inside the fixed end: −10·5 − 2·5²/2
    assert_abs_diff_eq!(analysis.moment_at(5.0 - 1e-9).unwrap(), -75.0, epsilon = 1e-6);
}

#[test]
fn coincident_supports_are_indeterminate() {
    let problem = BeamProblem::new("S4", Beam::overhanging(6.0, 3.0, 3.0))
        .with_point_load(PointLoad::vertical(1.0, -10.0));
    let err = analyze(&problem, &AnalysisSettings::default()).unwrap_err();
    assert!(matches!(err, BeamError::IndeterminateConfiguration { .. }));
    assert!(err.is_fatal());
}

#[test]
fn equilibrium_holds_exactly_for_every_configuration() {
    let problems = vec![
        mixed_overhang(),
        BeamProblem::new("exp", Beam::simply_supported(3.0)).with_distributed_load(DistributedLoad::new(
            0.5,
            2.5,
            LoadFunction::Exponential {
                amplitude: 1.5,
                rate: 0.7,
            },
        )),
        BeamProblem::new("cant", Beam::cantilever(7.0, FixedEnd::Right))
            .with_point_load(PointLoad::vertical(1.1, 0.3))
            .with_point_load(PointLoad::horizontal(2.0, -4.0))
            .with_moment(PointMoment::new(6.5, 1.25)),
        BeamProblem::new("numeric", Beam::overhanging(4.0, 4.0, 1.0)).with_distributed_load(
            DistributedLoad::new(0.0, 4.0, LoadFunction::numeric("1 + x^1.5", |x: f64| 1.0 + x.powf(1.5))),
        ),
    ];

    for problem in &problems {
        let analysis = run(problem);
        assert!(analysis.is_balanced(), "{} not balanced", problem.label);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let problem = mixed_overhang();
    let first = run(&problem);
    let second = run(&problem);
    assert_eq!(first.solution(), second.solution());
    assert_eq!(first.totals(), second.totals());
    assert_eq!(first.diagrams().unwrap(), second.diagrams().unwrap());
}

#[test]
fn shear_is_the_slope_of_moment() {
    let analysis = run(&mixed_overhang());
    let h = 1e-5;
    // Away from 2, 4, 5.5, 6, 9, 12
    for x in [0.7, 1.5, 3.0, 4.8, 7.3, 8.1, 10.0, 11.4] {
        let slope = (analysis.moment_at(x + h).unwrap() - analysis.moment_at(x - h).unwrap()) / (2.0 * h);
        assert_abs_diff_eq!(slope, analysis.shear_at(x).unwrap(), epsilon = 1e-4);
    }
}

#[test]
fn axial_and_shear_are_right_continuous_steps() {
    let problem = BeamProblem::new("steps", Beam::simply_supported(10.0))
        .with_point_load(PointLoad::vertical(3.0, -30.0))
        .with_point_load(PointLoad::vertical(7.0, 12.0))
        .with_point_load(PointLoad::horizontal(4.0, 8.0));
    let analysis = run(&problem);

    // Constant between load locations
    assert_eq!(analysis.shear_at(3.5).unwrap(), analysis.shear_at(6.5).unwrap());
    assert_eq!(analysis.axial_at(0.5), analysis.axial_at(3.9));

    // Jump equals the load, and the load's own location takes the right-hand value
    let before = analysis.shear_at(3.0 - 1e-9).unwrap();
    let at = analysis.shear_at(3.0).unwrap();
    assert_relative_eq!(at - before, -30.0, epsilon = 1e-12);
    assert_eq!(at, analysis.shear_at(3.0 + 1e-9).unwrap());

    let jump = analysis.shear_at(7.0).unwrap() - analysis.shear_at(7.0 - 1e-9).unwrap();
    assert_relative_eq!(jump, 12.0, epsilon = 1e-12);

    assert_relative_eq!(analysis.axial_at(4.0) - analysis.axial_at(4.0 - 1e-9), -8.0, epsilon = 1e-12);
}

#[test]
fn moment_grid_agrees_with_direct_moment() {
    let analysis = run(&mixed_overhang());
    let grid = analysis.diagrams().unwrap().moment;
    assert_eq!(grid.len(), AnalysisSettings::default().moment_grid_samples);

    // Shear jumps total about 205 here; each costs at most |jump|·dx/2 on the grid
    let tolerance = 0.3;
    for &(x, m) in grid.points.iter().filter(|(x, _)| (x - 4.0).abs() > 0.01 && *x < 12.0) {
        assert_abs_diff_eq!(m, analysis.moment_at(x).unwrap(), epsilon = tolerance);
    }
}

#[test]
fn reactions_listed_apart_from_applied_loads() {
    let analysis = run(&mixed_overhang());
    let vertical = &analysis.totals().vertical;
    assert_eq!(vertical.applied.len(), 2);
    assert_eq!(vertical.reactions.len(), 2);
    assert_eq!(vertical.to_vec()[2..], vertical.reactions[..]);
}

#[test]
fn undefined_load_function_reports_its_index() {
    let problem = BeamProblem::new("bad", Beam::simply_supported(4.0))
        .with_distributed_load(DistributedLoad::uniform(0.0, 4.0, 1.0))
        .with_distributed_load(DistributedLoad::new(
            0.0,
            2.0,
            LoadFunction::numeric("sqrt(x - 1)", |x: f64| (x - 1.0).sqrt()),
        ));
    match analyze(&problem, &AnalysisSettings::default()).unwrap_err() {
        BeamError::Integration { load_index, .. } => assert_eq!(load_index, Some(1)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn load_with_unbounded_end_slope_integrates_under_default_settings() {
    let length: f64 = 4.0;
    let problem = BeamProblem::new("root", Beam::simply_supported(length)).with_distributed_load(
        DistributedLoad::new(0.0, length, LoadFunction::numeric("sqrt(x)", |x: f64| x.sqrt())),
    );
    let analysis = run(&problem);

    let resultant = 2.0 / 3.0 * length.powf(1.5);
    let first_moment = 2.0 / 5.0 * length.powf(2.5);
    let pin = analysis.reaction(ReactionKind::PinVertical).unwrap();
    let roller = analysis.reaction(ReactionKind::RollerVertical).unwrap();
    assert_relative_eq!(pin + roller, resultant, epsilon = 1e-9);
    assert_relative_eq!(roller, first_moment / length, epsilon = 1e-9);
    assert!(analysis.is_balanced());

    // Shear just right of the pin is the pin reaction
    assert_abs_diff_eq!(analysis.shear_at(1e-9).unwrap(), pin, epsilon = 1e-6);
    assert!(analysis.diagrams().is_ok());
}

#[test]
fn expression_load_matches_closed_form_integral() {
    let problem = BeamProblem::new("shifted root", Beam::simply_supported(4.0)).with_distributed_load(
        DistributedLoad::new(1.0, 4.0, LoadFunction::expression("sqrt(x - 1)").unwrap()),
    );
    let analysis = run(&problem);

    // u = x - 1 over [0, 3]: ∫√u = (2/3)3^1.5, ∫(u + 1)√u = (2/5)3^2.5 + (2/3)3^1.5
    let resultant = 2.0 / 3.0 * 3.0_f64.powf(1.5);
    let first_moment = 2.0 / 5.0 * 3.0_f64.powf(2.5) + resultant;
    let roller = analysis.reaction(ReactionKind::RollerVertical).unwrap();
    let pin = analysis.reaction(ReactionKind::PinVertical).unwrap();
    assert_relative_eq!(roller, first_moment / 4.0, epsilon = 1e-9);
    assert_relative_eq!(pin + roller, resultant, epsilon = 1e-9);
}
