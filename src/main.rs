//! Main entry point for custdelta CLI

use clap::Parser;
use custdelta::cli::{Cli, Commands};
use custdelta::commands::{execute_command, GlobalOptions};
use custdelta::context::date_stamp;
use custdelta::logging;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    let options = GlobalOptions {
        config_path: cli.config.clone(),
        data_dir: cli.data_dir.clone(),
        quiet: cli.quiet,
    };

    // Log file is named after the run date when one is given
    let stamp = match &cli.command {
        Commands::Run { date: Some(date), .. } => date.clone(),
        _ => date_stamp(chrono::Local::now().date_naive()),
    };
    let log_dir = options.load_config().ok().and_then(|c| c.log_directory);

    if let Err(e) = logging::init(log_dir.as_deref(), &stamp, cli.verbose) {
        eprintln!("Warning: file logging unavailable ({}), logging to stderr", e);
        let _ = logging::init(None, &stamp, cli.verbose);
    }

    // Execute the command
    if let Err(e) = execute_command(cli.command, &options) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
