use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod sink;

#[derive(Parser)]
#[command(name = "focusgrid-cli", version, about = "focusgrid Pomodoro timer")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer in the foreground
    Run(commands::run::RunArgs),
    /// List available modes
    Modes,
    /// Record a completed focus session by hand
    Log(commands::record::LogArgs),
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Show the focus heatmap
    Heatmap(commands::heatmap::HeatmapArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Focus playlist URL
    Playlist {
        #[command(subcommand)]
        action: commands::playlist::PlaylistAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Modes => commands::modes::run(),
        Commands::Log(args) => commands::record::run(args),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Heatmap(args) => commands::heatmap::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Playlist { action } => commands::playlist::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
