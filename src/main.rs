use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use rusty_beatmap::data::loader;
use rusty_beatmap::{Analysis, AnalysisConfig, BetError, Objective};

#[derive(Debug, Parser)]
#[command(name = "rusty-beatmap")]
#[command(about = "BET surface area with Rouquerol consistency criteria", long_about = None)]
struct Cli {
    /// Isotherm file (.csv, .txt, .json or .parquet)
    file: PathBuf,

    /// Adsorbate cross-sectional area, square angstrom (16.2 for N2)
    #[arg(short = 'a', long)]
    cross_section: f64,

    /// Adsorbate / adsorbent description, used in export file names
    #[arg(long, default_value = "")]
    info: String,

    /// JSON analysis config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum points per range
    #[arg(long)]
    points: Option<usize>,

    /// Selection objective: error, points, max or min
    #[arg(long)]
    objective: Option<Objective>,

    #[arg(long, action = ArgAction::SetTrue)]
    no_positive_intercept: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    no_increasing: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    no_monolayer_in_range: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    no_pressure_consistency: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    no_enough_points: bool,

    /// Write raw and processed tables into this directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,
}

impl Cli {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        let criteria = &mut config.criteria;
        if let Some(points) = self.points {
            criteria.min_points = points;
        }
        criteria.positive_intercept &= !self.no_positive_intercept;
        criteria.increasing &= !self.no_increasing;
        criteria.monolayer_in_range &= !self.no_monolayer_in_range;
        criteria.pressure_consistency &= !self.no_pressure_consistency;
        criteria.enough_points &= !self.no_enough_points;
        if let Some(objective) = self.objective {
            config.objective = objective;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.analysis_config()?;

    let data = loader::load_file(&cli.file, cli.cross_section, &cli.info)
        .with_context(|| format!("loading isotherm {}", cli.file.display()))?;
    info!("loaded {} points from {}", data.sample.len(), cli.file.display());

    let analysis = Analysis::run(data, &config);

    if let Some(summary) = &analysis.summary {
        println!("{summary}");
        println!();
    }

    match analysis.answer() {
        Ok(answer) => {
            let t = &answer.trial;
            println!(
                "SSA = {:.3} m2/g ({} objective), C = {:.3}, nm = {:.6e} mol/g",
                t.ssa, answer.objective, t.c, t.nm
            );
            println!(
                "range {} (relative pressure {:.3} to {:.3}), {} points, error {:.3} %",
                t.range,
                analysis.isotherm.sample.relp()[t.range.start],
                analysis.isotherm.sample.relp()[t.range.end],
                t.points,
                t.error
            );
            if let Some(single) = analysis.single_point_answer() {
                println!(
                    "single-point BET over the same range: SSA = {:.3} m2/g, nm = {:.6e} mol/g",
                    single.ssa, single.nm
                );
            }
        }
        Err(BetError::NoValidRange) => println!("{}", BetError::NoValidRange),
        Err(e) => return Err(e.into()),
    }

    if let Some(dir) = &cli.export_dir {
        let written = analysis
            .export(dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        for path in written {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
