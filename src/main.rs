//! sniffrom - Passive SPI flash reconstruction
//!
//! Rebuilds the contents of a SPI flash chip from a logic analyzer capture of
//! the bus. Every READ and PAGE PROGRAM transaction seen in the capture is
//! replayed into an image buffer, so the result covers whatever the host
//! happened to access.
//!
//! # Outputs
//!
//! - the image rebuilt from reads and writes (`-o`, default `output.bin`)
//! - the image rebuilt from writes only (`out_write.bin`)
//! - optionally an opcode summary table and an access map graph

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;
use commands::{SniffOptions, WRITES_OUTPUT};
use sniffrom_core::decoder::DecoderConfig;
use sniffrom_core::session::SessionConfig;
use sniffrom_core::spi::{AddressConfig, AddressWidth};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let options = SniffOptions {
        input: cli.input_file,
        session: SessionConfig {
            decoder: DecoderConfig {
                address: AddressConfig::new(
                    AddressWidth::from_bytes(cli.addrlen)?,
                    cli.endian.into(),
                ),
                filter: cli.filter.into(),
            },
            capacity: cli.capacity,
            fill: cli.fill,
        },
        output: cli.output,
        writes_output: PathBuf::from(WRITES_OUTPUT),
        summary: cli.summary,
        graph: cli.graph.then_some(cli.graph_output),
        verbose: cli.verbose,
    };

    if let Err(e) = commands::run_sniff(&options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}
