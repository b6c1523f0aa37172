//! cache-check CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cache_check::notify::{EventPayload, GitHubCommentSink};
use cache_check::{CacheCheck, CheckConfig, Cli};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> cache_check::Result<()> {
    let cli = Cli::parse();

    let repo_root = std::env::current_dir()?;
    let config = CheckConfig::load(&repo_root)?;
    init_tracing(&config.logging.level);

    // Without a delivery target there is no point analyzing anything
    let payload = EventPayload::from_env()?;
    let mut sink = GitHubCommentSink::new(payload.comments_url(), cli.token)?;

    CacheCheck::new(repo_root, config).run(&mut sink)?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cache_check={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
