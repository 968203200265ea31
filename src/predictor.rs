//! Conditional branch predictors.

pub mod counter;
pub mod table;
pub mod engine;

pub use counter::*;
pub use table::*;
pub use engine::*;

use crate::branch::*;

/// Interface between a predictor and the simulator replaying a trace.
///
/// For each conditional branch the simulator calls [predict] and then,
/// once the branch is resolved, [update] for the same dynamic instance.
/// All other instructions are passed to [track_other_inst].
///
/// [predict]: ConditionalPredictor::predict
/// [update]: ConditionalPredictor::update
/// [track_other_inst]: ConditionalPredictor::track_other_inst
pub trait ConditionalPredictor {
    fn name(&self) -> &'static str;

    /// Return all internal state to its initial value.
    fn reset(&mut self);

    /// Return the predicted direction for the branch at `pc`.
    fn predict(&self, pc: u64) -> Outcome;

    /// Train the predictor with the resolved direction of the branch at `pc`.
    fn update(&mut self,
        pc: u64, kind: OpKind, resolved: Outcome, predicted: Outcome, tgt: u64
    );

    /// Observe an instruction which is not a conditional branch.
    fn track_other_inst(&mut self,
        _pc: u64, _kind: OpKind, _taken: Outcome, _tgt: u64
    ) {
    }
}
