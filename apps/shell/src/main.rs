mod args;
mod handlers;

use crate::args::{Cli, Commands};
use crate::handlers::package::PackageRequest;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use verity::domain::UserId;
use verity::kernel::config::load_verity_config;
use verity_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_verity_config(cli.config.as_deref())
        .context("Critical: Configuration is malformed")?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &logging)?;

    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Geolocation { suggestion, json, out: file } => {
            handlers::geolocation::run(&mut out, suggestion, json, file.as_deref())?;
        },
        Commands::Request { packages, out: file } => {
            handlers::request::run(&mut out, packages, &file)?;
        },
        Commands::Package { name, user, hosts, verified, selected, no_link_handling, out: file } => {
            let registry = verity::init(&config);
            let request = PackageRequest {
                name,
                user: UserId(user),
                hosts,
                verified,
                selected,
                link_handling: !no_link_handling,
            };
            handlers::package::run(&mut out, &registry, request, &file)?;
        },
        Commands::Inspect { file, kind } => handlers::inspect::run(&mut out, &file, kind)?,
    }

    out.flush()?;
    Ok(())
}
