//! Core data models for the standings aggregator.

mod ids;
mod race_result;
mod season;
mod standing;

pub use ids::*;
pub use race_result::*;
pub use season::*;
pub use standing::*;
