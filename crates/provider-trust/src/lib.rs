//! Trust scoring for marketplace service-provider profiles.
//!
//! The [`trust`] module holds the scoring core: a lexicon-driven sentiment classifier, the
//! multi-factor score calculator, and the service that keeps per-review sentiment and
//! per-profile scores consistent with the repositories it is handed.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod trust;
