use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "notifier-shell",
    version,
    about = "Polls the storefront notification API and logs badge, list and toast updates."
)]
pub struct Args {
    /// Configuration file to use instead of $NOTIFIER_CONFIG or the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stores this access token in client storage before starting.
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Run a single poll tick, print the recent list and exit.
    #[arg(long)]
    pub once: bool,
}
