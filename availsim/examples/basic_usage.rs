//! Basic usage example showing how to use the availsim meta-crate

use availsim::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The engine on its own: an empty simulation completes immediately
    // because no events are scheduled.
    let mut sim = Simulation::default();
    sim.execute(Executor::unbound());
    println!("Empty simulation completed at time: {}", sim.time());

    // A full readiness study through the facade.
    let report = run_study(&StudyConfig::default())?;
    println!("Analytical upper bound: {:.4}", report.upper_bound);
    println!("Analytical lower bound: {:.4}", report.lower_bound);
    println!("Curve length: {} ticks", report.curve.len());

    Ok(())
}
