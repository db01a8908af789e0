//! Preterm birth risk screening from antenatal visit records.
//!
//! An uploaded visit table is prepared once (free-text categorisation and lab indicator
//! recoding), then individual patients are scored from their latest visit by a
//! pre-trained classifier that also explains flagged predictions.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod predict;

pub use error::{Result, RiskError};
