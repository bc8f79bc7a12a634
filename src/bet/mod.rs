//! BET analysis core: range fits, Rouquerol criteria and answer selection.
//!
//! Architecture:
//! ```text
//!   IsothermSample
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ transform   │  least-squares BET fit per candidate range → RangeGrid<BetTrial>
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ criteria    │  five Rouquerol checks → CriteriaMask
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ select      │  objective + tie-break over valid ranges → SsaAnswer
//!   └────────────┘
//! ```

pub mod criteria;
pub mod grid;
pub mod regression;
pub mod select;
pub mod transform;

pub use criteria::{rouquerol_mask, CriteriaMask};
pub use grid::{CandidateRange, RangeGrid};
pub use select::{ssa_answer, SsaAnswer};
pub use transform::{bet_trials, single_point_bet, BetTrial, SinglePointTrial};
