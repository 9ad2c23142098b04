//! Promptlab CLI entry point.

use clap::Parser;
use promptlab_cli::{run, Cli};
use promptlab_core::env::{self, vars};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable.
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default_filter = [
        "promptlab_cli",
        "promptlab_core",
        "promptlab_vault",
        "promptlab_providers",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",");
    let filter = EnvFilter::try_new(env::get_var_or(vars::PROMPTLAB_LOG, &default_filter))
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if env::get_bool(vars::PROMPTLAB_LOG_JSON) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    run(cli).await
}
