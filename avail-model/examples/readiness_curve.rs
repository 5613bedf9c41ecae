//! Runs the default readiness study and prints the bound comparison.
//!
//! ```bash
//! cargo run --example readiness_curve
//! RUST_LOG=avail_model=debug cargo run --example readiness_curve
//! ```

use avail_core::init_simulation_logging_with_level;
use avail_model::{run_study, StudyConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StudyConfig::default();
    init_simulation_logging_with_level(if config.debug { "debug" } else { "info" });

    let report = run_study(&config)?;

    println!("Readiness study: {} units, {} workers, λ={}, μ={}",
        config.unit_count, config.workers, config.failure_rate, config.repair_rate);
    println!("  replications: {}, horizon: {} time units", config.replications, config.horizon);
    println!();
    println!("  analytical upper bound: {:.4}", report.upper_bound);
    println!("  analytical lower bound: {:.4}", report.lower_bound);

    let warmup = config.horizon as usize / 10;
    if let Some(estimate) = report.steady_state_estimate(warmup) {
        println!("  empirical steady state: {estimate:.4} (first {warmup} ticks discarded)");
    }

    println!();
    println!("  availability curve (every 100th tick):");
    for (tick, avg) in report.curve.iter().filter(|(t, _)| t % 100 == 0) {
        println!("    t={tick:>5}  K_g={avg:.3}");
    }

    Ok(())
}
