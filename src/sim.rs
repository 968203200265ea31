//! Replaying traces through a predictor.

use log::{debug, trace};

use crate::branch::*;
use crate::predictor::ConditionalPredictor;
use crate::stats::BranchStats;

/// Replay some records through a predictor.
///
/// Conditional branches are predicted and then immediately trained with
/// the resolved outcome. Every other record is passed to
/// [ConditionalPredictor::track_other_inst].
pub fn replay(records: &[BranchRecord], p: &mut impl ConditionalPredictor)
    -> BranchStats
{
    let mut stat = BranchStats::new();

    for record in records {
        stat.global_insts += 1;
        if !record.is_conditional() {
            p.track_other_inst(record.pc, record.kind, record.outcome, record.tgt);
            continue;
        }

        let prediction = p.predict(record.pc);
        if prediction != record.outcome {
            trace!("{:016x}: predicted {:?}, resolved {:?}",
                record.pc, prediction, record.outcome);
        }
        stat.update_global(record, prediction);
        stat.update_per_branch(record, prediction);

        p.update(record.pc, record.kind, record.outcome, prediction, record.tgt);
    }

    debug!("{}: {}/{} hits over {} instructions",
        p.name(), stat.global_hits(), stat.global_brns(), stat.global_insts());
    stat
}
