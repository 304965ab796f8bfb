//! Demo CLI comparing a few built-in code fragments.
//!
//! Usage:
//!   keit              # Run all comparisons
//!   keit --list       # List available comparisons
//!   keit sort         # Run one comparison
//!   keit --help       # Show help

use std::cell::RefCell;
use std::env;
use std::fmt::Debug;

use keit::observer::TracingObserver;
use keit::{tui, Block, Keit, PinStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

struct Options {
    iterations: usize,
    weight: f64,
    size: usize,
    seed: u64,
    pin: PinStrategy,
    verbose: bool,
}

struct Comparison {
    name: &'static str,
    description: &'static str,
    run: fn(&Options) -> keit::Result<()>,
}

const COMPARISONS: &[Comparison] = &[
    Comparison {
        name: "vec",
        description: "Building a Vec: push, push with capacity, collect",
        run: compare_vec,
    },
    Comparison {
        name: "sort",
        description: "Sorting random u32s: stable vs unstable (copy made in setup)",
        run: compare_sort,
    },
    Comparison {
        name: "sum",
        description: "Summing a slice: iterator sum vs indexed loop vs fold",
        run: compare_sum,
    },
];

/// Get a seed from current time for randomization
fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

fn random_input(opts: &Options) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    (0..opts.size).map(|_| rng.random_range(0..1_000_000)).collect()
}

fn run_and_print<'a, T: Debug>(
    opts: &Options,
    comparison: &str,
    runner: Keit<'a, T>,
    tracer: &'a mut TracingObserver,
) -> keit::Result<()> {
    let mut runner = runner
        .iterations(opts.iterations)
        .weight(opts.weight)
        .pin(opts.pin)
        .warning(true);
    if opts.verbose {
        runner = runner.observer(tracer);
    }

    let names: Vec<String> = runner.candidate_names().map(str::to_string).collect();
    tracing::info!(comparison, candidates = ?names, "running");

    let report = runner.run()?;
    tui::print_results_table(&report);
    Ok(())
}

fn compare_vec(opts: &Options) -> keit::Result<()> {
    let mut tracer = TracingObserver;
    let size = opts.size;
    let runner = Keit::new()
        .candidate(
            "push",
            Block::new(move || {
                let mut v = Vec::new();
                for i in 0..size {
                    v.push(i);
                }
                v.len()
            }),
        )
        .candidate(
            "with_capacity",
            Block::new(move || {
                let mut v = Vec::with_capacity(size);
                for i in 0..size {
                    v.push(i);
                }
                v.len()
            }),
        )
        .candidate(
            "collect",
            Block::new(move || (0..size).collect::<Vec<_>>().len()),
        );
    run_and_print(opts, "vec", runner, &mut tracer)
}

fn compare_sort(opts: &Options) -> keit::Result<()> {
    let mut tracer = TracingObserver;
    let input = random_input(opts);
    let stable = RefCell::new(Vec::with_capacity(input.len()));
    let unstable = RefCell::new(Vec::with_capacity(input.len()));

    let refill = |work: &RefCell<Vec<u32>>| {
        let mut work = work.borrow_mut();
        work.clear();
        work.extend_from_slice(&input);
    };

    let runner = Keit::new()
        .candidate(
            "sort",
            Block::new(|| {
                let mut work = stable.borrow_mut();
                work.sort();
                work.first().copied()
            })
            .with_setup(|| refill(&stable)),
        )
        .candidate(
            "sort_unstable",
            Block::new(|| {
                let mut work = unstable.borrow_mut();
                work.sort_unstable();
                work.first().copied()
            })
            .with_setup(|| refill(&unstable)),
        );
    run_and_print(opts, "sort", runner, &mut tracer)
}

fn compare_sum(opts: &Options) -> keit::Result<()> {
    let mut tracer = TracingObserver;
    let input: Vec<u64> = random_input(opts).into_iter().map(u64::from).collect();
    let data = &input;

    let runner = Keit::new()
        .candidate("iter_sum", Block::new(|| data.iter().sum::<u64>()))
        .candidate(
            "indexed_loop",
            Block::new(|| {
                let mut total = 0u64;
                for i in 0..data.len() {
                    total += data[i];
                }
                total
            }),
        )
        .candidate(
            "fold",
            Block::new(|| data.iter().fold(0u64, |acc, &x| acc + x)),
        );
    run_and_print(opts, "sum", runner, &mut tracer)
}

fn parse_pin(value: &str) -> Option<PinStrategy> {
    match value {
        "off" => Some(PinStrategy::Off),
        "global" => Some(PinStrategy::Global),
        "trial" => Some(PinStrategy::PerTrial),
        _ => None,
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut show_list = false;
    let mut show_help = false;
    let mut opts = Options {
        iterations: 1000,
        weight: 0.25,
        size: 1024,
        seed: time_seed(),
        pin: PinStrategy::Off,
        verbose: false,
    };
    let mut filter: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--list" | "-l" => show_list = true,
            "--help" | "-h" => show_help = true,
            "--verbose" | "-v" => opts.verbose = true,
            "--iter" => {
                i += 1;
                if i < args.len() {
                    opts.iterations = args[i].parse().unwrap_or(1000);
                }
            }
            "--weight" => {
                i += 1;
                if i < args.len() {
                    opts.weight = args[i].parse().unwrap_or(0.25);
                }
            }
            "--size" => {
                i += 1;
                if i < args.len() {
                    opts.size = args[i].parse().unwrap_or(1024);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    opts.seed = args[i].parse().unwrap_or(opts.seed);
                }
            }
            "--pin" => {
                i += 1;
                match args.get(i).and_then(|v| parse_pin(v)) {
                    Some(pin) => opts.pin = pin,
                    None => {
                        eprintln!("--pin expects one of: off, global, trial");
                        std::process::exit(1);
                    }
                }
            }
            arg if !arg.starts_with('-') => {
                filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let level = if opts.verbose { "trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if show_help {
        tui::print_help();
        return;
    }

    if show_list {
        println!("Available comparisons:");
        println!();
        for comparison in COMPARISONS {
            println!("  {:<10} - {}", comparison.name, comparison.description);
        }
        return;
    }

    let selected: Vec<&Comparison> = match &filter {
        Some(name) => match COMPARISONS.iter().find(|c| c.name == name.as_str()) {
            Some(comparison) => vec![comparison],
            None => {
                eprintln!("Comparison '{}' not found.", name);
                eprintln!(
                    "Available: {:?}",
                    COMPARISONS.iter().map(|c| c.name).collect::<Vec<_>>()
                );
                std::process::exit(1);
            }
        },
        None => COMPARISONS.iter().collect(),
    };

    tui::print_header();
    tracing::debug!(seed = opts.seed, size = opts.size, "inputs");

    for comparison in selected {
        tui::print_comparison_box(
            comparison.name,
            comparison.description,
            opts.iterations,
            opts.weight,
        );
        if let Err(e) = (comparison.run)(&opts) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    println!("Note: lower score is better; relative score is against the best candidate.");
}
