use crate::demo::{run_band, run_chat, run_demo, run_price, BandArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use safeyatri::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SafeYatri",
    about = "Run the SafeYatri travel-safety companion service or explore it from the command line",
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
    /// Walk a new traveler from signup through every feature screen
    Demo(DemoArgs),
    /// Stream simulated smart-band readings
    Band(BandArgs),
    /// Look up fair prices for a market item
    Price {
        /// Item name, e.g. "wooden elephant"
        item: String,
    },
    /// Ask the local enquiry assistant a question
    Chat {
        /// Question text, e.g. "nearest bus stop"
        message: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Band(args) => run_band(args).await,
        Command::Price { item } => run_price(&item),
        Command::Chat { message } => run_chat(&message),
    }
}
