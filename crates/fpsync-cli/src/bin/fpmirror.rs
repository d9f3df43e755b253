//! fpmirror
//!
//! Mirrors sources into a destination, or syncs one directory pair both
//! ways, with rsync.

use clap::Parser;

use fpsync_cli::cli::FpmirrorCli;
use fpsync_cli::{commands, error, logging};

fn main() {
    let cli = FpmirrorCli::parse();
    logging::init(cli.flags.verbose, cli.flags.quiet);

    match commands::run_mirror(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error::report(&e);
            std::process::exit(1);
        }
    }
}
