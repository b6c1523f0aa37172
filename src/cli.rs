//! CLI argument definitions using clap

use clap::Parser;

/// Flags cached HAML fragments whose cache key was not bumped alongside a changed partial
#[derive(Parser, Debug)]
#[command(name = "cache-check")]
#[command(about = "Comments on a pull request when a changed partial is rendered under an untouched cache key")]
#[command(version)]
pub struct Cli {
    /// Token used to post pull request comments
    #[arg(value_name = "TOKEN")]
    pub token: String,
}
