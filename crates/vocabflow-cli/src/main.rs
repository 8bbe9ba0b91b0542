use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vocabflow", version, about = "VocabFlow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Word list management
    List {
        #[command(subcommand)]
        action: commands::list::ListAction,
    },
    /// Word management within a list
    Word {
        #[command(subcommand)]
        action: commands::word::WordAction,
    },
    /// Learning sessions
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Backup and restore
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VOCABFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::List { action } => commands::list::run(action),
        Commands::Word { action } => commands::word::run(action),
        Commands::Study { action } => commands::study::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
