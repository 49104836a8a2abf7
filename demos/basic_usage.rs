//! Basic logging pipeline example
//!
//! Wires a console and a file appender onto the root logger, then routes
//! a named logger through the same file appender.
//!
//! Run with: cargo run --example basic_usage

use rust_log_pipeline::prelude::*;
use rust_log_pipeline::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Log Pipeline - Basic Usage Example ===\n");

    let registry = LoggerRegistry::new();
    let root = registry.root();
    root.set_level(LogLevel::Info);

    let file = FileAppender::new("pipeline.log")?
        .with_formatter(LogFormatter::new("%d{iso8601} [%p] %t %f:%l %m%n").shared())
        .shared();
    root.add_appender(ConsoleAppender::with_colors(true).with_level(LogLevel::Warn).shared());
    root.add_appender(file.clone());

    println!("1. Root logger (console shows WARN and above):");
    info!(root, "Application started");
    warn!(root, "Using default settings for {} options", 2);
    root.debug(&LogEvent::new("filtered by the root threshold"));

    println!("\n2. Named logger sharing the file appender:");
    let db = registry.get_logger("db");
    db.add_appender(file);
    info!(db, "Connection pool ready with {} connections", 8);

    root.flush()?;
    println!(
        "\nRoot metrics: dispatched={}, filtered={}",
        root.metrics().dispatched_count(),
        root.metrics().filtered_count()
    );
    println!("Check 'pipeline.log' for the full log output");

    Ok(())
}
