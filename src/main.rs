//! Baseline Builder - macOS installer packages for the Baseline agent.
//!
//! This binary builds a Baseline `.pkg` from a configuration file and
//! validates it, or validates an existing package.

use std::io::Write;
use std::process;

#[tokio::main]
async fn main() {
    // Progress is the product's output, so log at info unless told otherwise.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    // Run CLI and get exit code
    let exit_code = match baseline_builder::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
