use crate::demo::{run_deal, run_market, run_screen, DealArgs, MarketArgs, ScreenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use deal_screener::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Deal Screener",
    about = "Screen flip and rental deals from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a what-if calculation for a single deal
    Deal(DealArgs),
    /// Classify a market from aggregate figures
    Market(MarketArgs),
    /// Score every listing in the catalog or a CSV export
    Screen(ScreenArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve listings from a CSV export instead of the sample catalog
    #[arg(long)]
    pub(crate) listings: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Deal(args) => run_deal(args),
        Command::Market(args) => run_market(args),
        Command::Screen(args) => run_screen(args),
    }
}
