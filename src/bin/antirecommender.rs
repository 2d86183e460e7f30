mod commands;

use antirecommender::Config;
use clap::Parser;
use commands::{execute_command, utils::AppContext, Commands};

/// Find the song your listening history would never lead you to
#[derive(Parser)]
#[command(
    name = "antirecommender",
    about = "Anti-recommendations from your recent listening history",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            eprintln!();
            eprintln!("The following environment variables are read (a .env file works too):");
            eprintln!("  BACKEND_URL=https://your-backend.example");
            eprintln!("  SPOTIFY_CLIENT_ID=your_client_id");
            eprintln!("  FRONTEND_URL=http://localhost:5173/");
            std::process::exit(1);
        }
    };

    let context = match AppContext::load(config) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("❌ Failed to open the session: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(args.command, &context).await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    Ok(())
}
