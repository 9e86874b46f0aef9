//! Tracing setup for the CLI.
//!
//! ```bash
//! XLATE_LOG=debug xlate --target smt tree.json
//! XLATE_LOG="xlate_emitter=debug,xlate_codegen=trace" xlate tree.json
//! ```
//!
//! The subscriber is only installed when `XLATE_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `XLATE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("XLATE_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global fmt subscriber, writing to stderr so it never mixes
/// with `--stdout` output.
pub fn init_tracing() {
    let has_xlate_log = std::env::var("XLATE_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_xlate_log && !has_rust_log {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
