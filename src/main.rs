use age_mon::{logging::init_logging, run, Cli, Config};
use clap::Parser;
use log::{debug, error, info};

/// Never fails, problems are logged so a scheduler always sees a clean exit
fn main() {
    let cli = Cli::parse();
    // Config decides where the log file goes so it is read before logging starts
    let config = Config::load(cli.config_filename.as_deref());

    let log_dir = config.as_ref().ok().and_then(|c| c.log_dir.clone());
    if let Err(e) = init_logging(cli.log_level.into(), log_dir.as_deref()) {
        eprintln!("Failed to start logging: {e:?}");
    }

    match &cli.config_filename {
        Some(path) => debug!("Config from: {path:?}"),
        None => debug!("No config file specified, using defaults"),
    }

    match config.and_then(|config| run(&cli, config)) {
        Ok(true) => info!("Check complete, age matched"),
        Ok(false) => info!("Check complete, no match found"),
        Err(e) => error!("{e:?}"),
    }
}
