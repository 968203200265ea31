use pretty_assertions::assert_eq;
use proptest::prelude::{any, prop, Just};
use proptest::strategy::Strategy as PropStrategy;
use proptest::{prop_assert, prop_assert_eq, prop_oneof, proptest};
use rstest::rstest;

use sapling::sim::replay;
use sapling::*;
use Outcome::*;

fn build(index_bits: u32, counter_bits: u32, strategy: Strategy) -> Predictor {
    Predictor::new(PredictorConfig::new(index_bits, counter_bits, strategy).unwrap())
}

fn step(p: &mut Predictor, pc: u64, resolved: Outcome) -> Outcome {
    let pred = p.predict(pc);
    p.update(pc, OpKind::JmpCond, resolved, pred, pc.wrapping_add(0x40));
    pred
}

#[test]
fn simple_scenario_from_text_trace() {
    let text = "\
        0x0 jcc T 0x100\n\
        0x0 jcc T 0x100\n\
        0x0 jcc T 0x100\n\
        0x0 jcc N 0x100\n";
    let trace = Trace::from_reader("scenario", text.as_bytes()).unwrap();
    let mut p = Predictor::new(PredictorConfig::from_args(&["2", "2", "0"]).unwrap());

    let stat = replay(trace.as_slice(), &mut p);
    // Predictions N, N, T, T against outcomes T, T, T, N.
    assert_eq!(stat.global_hits(), 1);
    assert_eq!(stat.global_miss(), 3);
    assert_eq!(p.table().as_slice(), &[2, 0, 0, 0]);
}

#[rstest]
#[case(Strategy::Simple, 0)]
#[case(Strategy::GShare, 6)]
#[case(Strategy::Local, 6)]
#[case(Strategy::Tournament, 6)]
fn taken_streak_saturates(#[case] strategy: Strategy, #[case] warmup: usize) {
    let mut p = build(6, 3, strategy);
    for _ in 0..warmup {
        step(&mut p, 0, T);
    }
    let threshold = p.config().count_max() / 2;
    for k in 1..=10u32 {
        step(&mut p, 0, T);
        let expected = Outcome::from(k.min(p.config().count_max()) > threshold);
        assert_eq!(p.predict(0), expected, "after {} taken updates", k);
    }
}

#[test]
fn instances_do_not_share_state() {
    let mut a = build(8, 2, Strategy::Tournament);
    let b = build(8, 2, Strategy::Tournament);
    for pc in (0..64).map(|i| 0x1000 + i * 4) {
        step(&mut a, pc, T);
    }
    assert!(a.table().as_slice().iter().any(|&v| v > 0));
    assert!(b.table().as_slice().iter().all(|&v| v == 0));
    assert_eq!(b.ghr().value(), 0);
}

#[test]
fn tournament_learns_mixed_trace() {
    use sapling::trace::synth::*;
    let mut s = TraceSynth::new(0x40_0000).with_filler(2);
    s.branch(BranchPattern::TakenPeriodic(3));
    s.branch(BranchPattern::Pattern(&[T, T, N, T, N, N]));
    s.branch(BranchPattern::AlwaysTaken);
    let trace = s.generate(6000, 3);

    let mut p = build(10, 2, Strategy::Tournament);
    let stat = replay(trace.as_slice(), &mut p);
    assert!(stat.hit_rate() > 0.9, "hit rate {}", stat.hit_rate());
    assert_eq!(stat.global_insts(), 18000);
}

fn any_strategy() -> impl PropStrategy<Value = Strategy> {
    prop_oneof![
        Just(Strategy::Simple),
        Just(Strategy::GShare),
        Just(Strategy::Local),
        Just(Strategy::Tournament),
    ]
}

proptest! {
    #[test]
    fn replay_is_deterministic(
        strategy in any_strategy(),
        index_bits in 1u32..=12,
        counter_bits in 1u32..=4,
        events in prop::collection::vec((any::<u64>(), any::<bool>()), 0..300),
    ) {
        let run = || {
            let mut p = build(index_bits, counter_bits, strategy);
            let preds: Vec<Outcome> = events.iter()
                .map(|&(pc, taken)| step(&mut p, pc, taken.into()))
                .collect();
            (preds, p)
        };
        let (preds_a, a) = run();
        let (preds_b, b) = run();
        prop_assert_eq!(preds_a, preds_b);
        prop_assert_eq!(a.table(), b.table());
        prop_assert_eq!(a.meta_table(), b.meta_table());
        prop_assert_eq!(a.ghr(), b.ghr());
        prop_assert_eq!(a.lht(), b.lht());
    }

    #[test]
    fn counters_stay_in_range(
        strategy in any_strategy(),
        counter_bits in 1u32..=3,
        events in prop::collection::vec((any::<u64>(), any::<bool>()), 0..300),
    ) {
        let mut p = build(4, counter_bits, strategy);
        let max = p.config().count_max();
        for &(pc, taken) in events.iter() {
            step(&mut p, pc, taken.into());
            p.track_other_inst(pc, OpKind::Op, N, 0);
        }
        prop_assert!(p.table().as_slice().iter().all(|&v| v <= max));
        prop_assert!(p.meta_table().as_slice().iter().all(|&v| v <= max));
        prop_assert!(p.ghr().value() <= 0xf);
    }
}
