//! fpsync
//!
//! Keeps a declared set of directory pairs in sync by running fpmirror on
//! each of them.

use clap::Parser;

use fpsync_cli::cli::FpsyncCli;
use fpsync_cli::{commands, error, logging};

fn main() {
    let cli = FpsyncCli::parse();
    logging::init(cli.flags.verbose, cli.flags.quiet);

    if let Err(e) = commands::run_batch(&cli) {
        error::report(&e);
        std::process::exit(1);
    }
}
