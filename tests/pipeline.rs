use approx::assert_relative_eq;

use rusty_beatmap::bet::transform::surface_area;
use rusty_beatmap::pipeline::run_file;
use rusty_beatmap::{
    Analysis, AnalysisConfig, BetError, CandidateRange, CriteriaConfig, IsothermData, Objective,
};

const NM: f64 = 0.001;
const C: f64 = 100.0;
const A_O: f64 = 16.2;

fn bet_amount(p: f64) -> f64 {
    NM * C * p / ((1.0 - p) * (1.0 - p + C * p))
}

/// Exact BET isotherm sampled at the given pressures.
fn bet_isotherm(relp: &[f64]) -> IsothermData {
    let n: Vec<f64> = relp.iter().map(|&p| bet_amount(p)).collect();
    IsothermData::from_lists(relp, &n, A_O, "synthetic N2").unwrap()
}

#[test]
fn straddling_pair_passes_every_criterion() {
    // Monolayer coverage for C = 100 sits at p = 1/11.
    let data = bet_isotherm(&[0.08, 0.10]);
    let config = AnalysisConfig {
        criteria: CriteriaConfig {
            min_points: 2,
            ..CriteriaConfig::default()
        },
        objective: Objective::Error,
    };
    let analysis = Analysis::run(data, &config);

    let mask = &analysis.mask;
    for grid in [
        &mask.positive_intercept,
        &mask.increasing,
        &mask.monolayer_in_range,
        &mask.pressure_consistency,
        &mask.enough_points,
        &mask.valid,
    ] {
        assert!(grid.values().all(|&ok| ok));
    }

    let answer = analysis.answer().unwrap();
    assert_relative_eq!(answer.ssa(), surface_area(NM, A_O), max_relative = 1e-9);
    assert_relative_eq!(answer.trial.c, C, max_relative = 1e-7);
}

#[test]
fn exact_isotherm_recovers_known_area() {
    let relp: Vec<f64> = (5..=14).map(|i| i as f64 / 100.0).collect();
    let analysis = Analysis::run(bet_isotherm(&relp), &AnalysisConfig::default());

    // Valid ranges bracket p = 1/11 (between indices 4 and 5) with at
    // least five points.
    let expected: Vec<CandidateRange> = rusty_beatmap::bet::grid::ranges(relp.len())
        .filter(|r| r.start <= 4 && r.end >= 5 && r.points() >= 5)
        .collect();
    assert_eq!(analysis.mask.passing_ranges(), expected);

    let answer = analysis.answer().unwrap();
    assert!(expected.contains(&answer.trial.range));
    assert_relative_eq!(answer.ssa(), surface_area(NM, A_O), max_relative = 1e-8);

    let summary = analysis.summary.as_ref().unwrap();
    assert_eq!(summary.valid_ranges, expected.len());
    assert_relative_eq!(summary.ssa.mean, surface_area(NM, A_O), max_relative = 1e-8);
    assert!(summary.ssa.std_dev < 1e-6);
}

#[test]
fn reference_isotherm_has_no_answer() {
    let data = IsothermData::from_lists(
        &[0.1, 0.2, 0.21, 0.3, 0.4, 0.5],
        &[0.001, 0.002, 0.004, 0.005, 0.0055, 0.006],
        11.11,
        "reference",
    )
    .unwrap();
    let analysis = Analysis::run(data, &AnalysisConfig::default());
    assert!(matches!(analysis.answer(), Err(BetError::NoValidRange)));
    assert!(analysis.summary.is_none());
}

#[test]
fn runs_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isotherm.csv");
    let relp: Vec<f64> = (5..=14).map(|i| i as f64 / 100.0).collect();
    let mut text = String::from("relative pressure,n (mol/g)\n");
    for &p in &relp {
        text.push_str(&format!("{p},{}\n", bet_amount(p)));
    }
    std::fs::write(&path, text).unwrap();

    let config = AnalysisConfig {
        objective: Objective::Points,
        ..AnalysisConfig::default()
    };
    let analysis = run_file(&path, A_O, "N2 at 77 K", &config).unwrap();
    assert_eq!(analysis.isotherm.source.as_deref(), Some(path.as_path()));
    let answer = analysis.answer().unwrap();
    // The full range is the longest valid one.
    assert_eq!(answer.trial.range, CandidateRange::new(0, 9));
    assert_relative_eq!(answer.ssa(), surface_area(NM, A_O), max_relative = 1e-8);
}

#[test]
fn bad_cross_section_is_rejected() {
    let result = IsothermData::from_lists(&[0.1, 0.2], &[0.001, 0.002], 0.0, "");
    assert!(matches!(result, Err(BetError::CrossSection(_))));
}

#[test]
fn repeated_pressure_pair_has_no_answer() {
    let data = IsothermData::from_lists(&[0.2, 0.2], &[0.001, 0.002], A_O, "repeated").unwrap();
    for objective in [Objective::Error, Objective::Points] {
        let config = AnalysisConfig {
            criteria: CriteriaConfig::none(),
            objective,
        };
        let analysis = Analysis::run(data.clone(), &config);
        assert!(matches!(analysis.answer(), Err(BetError::NoValidRange)));
        assert!(analysis.summary.is_none());
    }
}
