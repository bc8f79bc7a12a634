//! BET specific surface area analysis with the Rouquerol consistency
//! criteria.
//!
//! Every contiguous pressure range of an adsorption isotherm is fitted with
//! the linearized BET equation, each fit is checked against the five
//! Rouquerol criteria, and one surface area is selected from the ranges
//! that pass.
//!
//! ```no_run
//! use rusty_beatmap::{Analysis, AnalysisConfig, IsothermData};
//!
//! let data = IsothermData::from_lists(
//!     &[0.05, 0.1, 0.15, 0.2, 0.25, 0.3],
//!     &[0.0021, 0.0025, 0.0028, 0.0031, 0.0034, 0.0037],
//!     16.2,
//!     "N2 on silica",
//! )?;
//! let analysis = Analysis::run(data, &AnalysisConfig::default());
//! println!("{:.2} m2/g", analysis.answer()?.ssa());
//! # Ok::<(), rusty_beatmap::BetError>(())
//! ```

pub mod bet;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod summary;

pub use bet::{BetTrial, CandidateRange, CriteriaMask, RangeGrid, SsaAnswer};
pub use config::{AnalysisConfig, CriteriaConfig, Objective};
pub use data::model::{IsothermData, IsothermSample};
pub use error::{BetError, Result};
pub use pipeline::Analysis;
pub use summary::Summary;
