//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `driver_core` wiring end to end.
//! - Seed a store with random drivers and print the roster views.
//!
//! Reads `DRIVER_DB_PATH`, `DRIVER_LOG_LEVEL` and `DRIVER_LOG_DIR`; without
//! a database path the run uses a throwaway in-memory store.

use driver_core::{CoreConfig, DriverService};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    config.init_logging()?;

    println!("driver_core ping={}", driver_core::ping());
    println!("driver_core version={}", driver_core::core_version());

    let mut service = DriverService::open(&config)?;
    let generated = service.generate_random()?;
    info!(
        "event=cli_seed module=cli status=ok count={}",
        generated.len()
    );

    println!("roster:");
    for name in service.alphabetized_roster()? {
        println!("  {name}");
    }

    if let Some(first) = generated.first() {
        let name = service.alphabetized_name(first.id)?;
        println!("alphabetized {} -> {}", name.original, name.alphabetized);
    }

    Ok(())
}
