use clap::Parser;
use clap::Subcommand;
use commands::scan::Scan;
use commands::show::Show;
use commands::Options;

mod commands;
mod config;
mod core;
mod errors;
mod github;
mod parser;

#[derive(Debug, Parser)]
#[command(name = "repo-pruner")]
#[command(about = "Track inactive branches in a single summary issue", long_about = None)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Regenerate the summary issue
    Scan(Scan),
    /// List the keep/delete decisions in the summary issue
    Show(Show),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let result = args.options.into_config().and_then(|config| match args.command {
        Commands::Scan(scan) => scan.execute(config),
        Commands::Show(show) => show.execute(config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
