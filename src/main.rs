mod args;
mod prep;

use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = prep::run_preparation(&args) {
        for (idx, m) in prep::error_messages(&e).iter().enumerate() {
            if idx == 0 {
                eprintln!("An error occured: {}", m);
            } else {
                eprintln!("  caused by: {}", m);
            }
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
