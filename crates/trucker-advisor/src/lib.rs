//! Trailer recommendations for garage locations and profitability rankings
//! across every location of a reference-data snapshot.

pub mod config;
pub mod error;
pub mod optimizer;
pub mod reference;
pub mod telemetry;
