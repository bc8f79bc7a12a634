//! Data layer: isotherm types, loading, and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → IsothermSample
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ IsothermData  │  points, BET transforms, cross-section, info
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  raw + per-range results → .csv / .parquet
//!   └──────────┘
//! ```

pub mod export;
pub mod loader;
pub mod model;
