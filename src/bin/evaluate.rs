//! Evaluate a [`Predictor`] against a trace.

use std::process;

use anyhow::Context;
use clap::Parser;
use log::info;

use sapling::*;
use sapling::sim::replay;
use sapling::trace::synth::*;

#[derive(Parser, Debug)]
#[command(
    name = "evaluate",
    version,
    about = "Replay a branch trace through a conditional branch predictor",
    override_usage = "evaluate [OPTIONS] <trace> <index_bits> <counter_bits> <strategy>\n       \
                      evaluate --synthetic <N> [OPTIONS] <index_bits> <counter_bits> <strategy>",
)]
struct Cli {
    /// Replay a generated trace with this many branches instead of a file.
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    /// Seed for the generated trace.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of poorly predicted branches to list.
    #[arg(long, default_value_t = 8)]
    report: usize,

    /// Trace file (omitted with --synthetic), then the predictor
    /// parameters: index_bits counter_bits strategy.
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

fn usage_exit(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    eprintln!("usage: evaluate {}", USAGE);
    process::exit(1);
}

/// A handful of branches with different kinds of behavior.
fn synthetic_trace(num_branches: usize, seed: u64) -> Trace {
    use Outcome::*;
    let mut s = TraceSynth::new(0x40_0000).with_filler(3);
    s.branch(BranchPattern::AlwaysTaken);
    s.branch(BranchPattern::NeverTaken);
    s.branch(BranchPattern::TakenPeriodic(4));
    s.pad_align(0x1000);
    s.branch(BranchPattern::NotTakenPeriodic(7));
    s.branch(BranchPattern::Pattern(&[T, T, N, T, N]));
    s.branch(BranchPattern::Random(70));
    s.generate(num_branches, seed)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (trace, params) = match cli.synthetic {
        Some(n) => (synthetic_trace(n, cli.seed), &cli.args[..]),
        None => {
            let Some((path, params)) = cli.args.split_first() else {
                usage_exit("missing trace file");
            };
            let trace = Trace::from_file(path)
                .with_context(|| format!("failed to load trace '{}'", path))?;
            (trace, params)
        },
    };

    let cfg = match PredictorConfig::from_args(params) {
        Ok(cfg) => cfg,
        Err(e) => usage_exit(&e.to_string()),
    };
    info!("{:?}", cfg);

    let mut p = Predictor::new(cfg);
    let stat = replay(trace.as_slice(), &mut p);

    println!("[*] {}, {} records", trace.name(), trace.num_entries());
    println!("  {} ({} entries, {}-bit counters)",
        p.name(), cfg.num_entries(), cfg.counter_bits());
    println!("  Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
        stat.global_hits(),
        stat.global_brns(),
        stat.hit_rate() * 100.0,
        stat.global_miss()
    );
    println!("  MPKI: {:.4}", stat.mpki());
    println!("  Unique branches: {}", stat.num_unique_branches());

    let low = stat.get_low_rate_branches(cli.report, 100, 0.55);
    if !low.is_empty() {
        println!("  Low hit-rate branches:");
        for (pc, data) in low {
            println!("    {:016x}: {:8}/{:8} ({:.4}) {}",
                pc, data.hits, data.occ, data.hit_rate(),
                data.recent_pattern(32)
            );
        }
    }

    Ok(())
}
