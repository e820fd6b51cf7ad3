//! Countdown Demo
//!
//! Drives the facade the way a UI would: create a cycle, tick once per
//! second, finish it when the countdown reaches zero, then restart the
//! application and show that history survived.
//!
//! The clock is manual so the demo finishes instantly.
//!
//! Run with: RUST_LOG=debug cargo run --example countdown

use chrono::{Duration, Utc};
use cycle_timer::tracker::seconds_between;
use cycle_timer::{Clock, CyclesContext, FileStore, ManualClock, PersistenceConfig, PersistenceGateway};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Countdown Demo ===\n");

    let dir = std::env::temp_dir().join("cycle-timer-demo");
    let config = PersistenceConfig::builder().pretty(true).build();
    let store = FileStore::new(&dir);
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let mut context = match CyclesContext::load(
        PersistenceGateway::new(store.clone(), config.clone()),
        Arc::clone(&clock),
    ) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("Could not load state: {err}");
            return;
        }
    };

    println!("Loaded {} earlier cycle(s)", context.cycles().len());

    context.create_new_cycle("Write the report", 1);
    let started = clock.now();
    println!("Started: {:?}", context.active_cycle().map(|c| c.task()));

    // Tick loop: the core only exposes the setter, the loop lives here.
    while let Some(remaining) = context.remaining_seconds() {
        if remaining == 0 {
            context.mark_current_cycle_as_finished();
            break;
        }
        clock.advance(Duration::seconds(1));
        context.set_seconds_passed(seconds_between(started, clock.now()));
        if remaining % 15 == 0 {
            println!("  {remaining}s left");
        }
    }

    println!(
        "Finished after {}s, state saved to {}",
        context.amount_of_seconds_passed(),
        store.path_for(config.key()).display()
    );

    let restored = match CyclesContext::load(PersistenceGateway::new(store, config), clock) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("Could not reload state: {err}");
            return;
        }
    };

    let summary = restored.summary();
    println!(
        "\nAfter restart: {} cycle(s), {} finished, {} interrupted, {} focused minute(s)",
        summary.total, summary.finished, summary.interrupted, summary.focused_minutes
    );

    println!("\n=== Demo Complete ===");
}
