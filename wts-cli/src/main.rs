//! WTS CLI - Command line tool for regression analysis and gap filling of
//! monthly water time series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wts-cli",
    version,
    about = "Water time series regression and gap filling toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wts_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("wts-cli {}", env!("CARGO_PKG_VERSION"));
    wts_cmd::run(cli.command)
}
