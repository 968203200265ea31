//! Conditional branch predictors and a harness for replaying traces
//! through them.

pub mod branch;
pub mod config;
pub mod history;
pub mod predictor;
pub mod sim;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use config::*;
pub use history::*;
pub use predictor::*;
pub use trace::*;
