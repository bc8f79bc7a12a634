use std::path::{Path, PathBuf};

use log::warn;

use crate::bet::{
    bet_trials, rouquerol_mask, single_point_bet, ssa_answer, BetTrial, CriteriaMask, RangeGrid,
    SinglePointTrial, SsaAnswer,
};
use crate::config::AnalysisConfig;
use crate::data::export::{self, ProcessedRow};
use crate::data::loader;
use crate::data::model::IsothermData;
use crate::error::{BetError, Result};
use crate::summary::Summary;

// ---------------------------------------------------------------------------
// Analysis – everything computed for one isotherm
// ---------------------------------------------------------------------------

/// Full BET analysis of one isotherm: per-range fits, criterion flags, the
/// selected answer and a summary of the valid ranges.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub isotherm: IsothermData,
    pub config: AnalysisConfig,
    pub trials: RangeGrid<BetTrial>,
    pub single_point: RangeGrid<SinglePointTrial>,
    pub mask: CriteriaMask,
    /// `None` when no range passes the enabled criteria.
    pub answer: Option<SsaAnswer>,
    pub summary: Option<Summary>,
}

impl Analysis {
    /// Run the analysis. Finding no valid range is not an error here; it
    /// leaves `answer` and `summary` empty.
    pub fn run(isotherm: IsothermData, config: &AnalysisConfig) -> Self {
        let sample = &isotherm.sample;
        let trials = bet_trials(sample, isotherm.a_o);
        let single_point = single_point_bet(sample, isotherm.a_o);
        let mask = rouquerol_mask(sample, &trials, &config.criteria);

        let answer = match ssa_answer(&trials, &mask, config.objective) {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        let summary = Summary::new(sample, &trials, &mask);

        Analysis {
            isotherm,
            config: *config,
            trials,
            single_point,
            mask,
            answer,
            summary,
        }
    }

    /// Selected answer, or [`BetError::NoValidRange`].
    pub fn answer(&self) -> Result<&SsaAnswer> {
        self.answer.as_ref().ok_or(BetError::NoValidRange)
    }

    pub fn processed_rows(&self) -> Vec<ProcessedRow> {
        export::processed_rows(&self.isotherm.sample, &self.trials, &self.single_point, &self.mask)
    }

    /// Single-point BET estimate over the selected answer's window.
    pub fn single_point_answer(&self) -> Option<SinglePointTrial> {
        let answer = self.answer.as_ref()?;
        self.single_point.get(answer.trial.range).copied()
    }

    /// Write raw and processed tables into `dir`.
    pub fn export(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        export::export_all(dir, &self.isotherm.info, &self.isotherm.sample, &self.processed_rows())
    }
}

/// Load an isotherm file and analyse it in one step.
pub fn run_file(path: &Path, a_o: f64, info: &str, config: &AnalysisConfig) -> Result<Analysis> {
    let isotherm = loader::load_file(path, a_o, info)?;
    Ok(Analysis::run(isotherm, config))
}
