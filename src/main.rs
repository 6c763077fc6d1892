use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

mod args;
mod msi;

use crate::args::Args;
use crate::msi::config_reader::Settings;

fn main() {
    // The .env file is optional.
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    debug!("args: {:?}", args);
    if let Some(p) = dotenv_path {
        debug!("Loaded environment from {:?}", p);
    }

    let settings = Settings::from_args(&args);
    let res = msi::run_msi(&settings);

    if let Err(e) = res {
        eprintln!("An error occured {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = std::error::Error::source(cause);
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
