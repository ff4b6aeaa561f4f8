//! Capture reconstruction command

use indicatif::{ProgressBar, ProgressStyle};
use sniffrom_core::capture::CaptureReader;
use sniffrom_core::decoder::TransactionSummary;
use sniffrom_core::image::{Applied, FlashImage};
use sniffrom_core::session::{Session, SessionConfig, SessionObserver};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{dump, graph, report};
use crate::error::{Result, SniffError};

/// Fixed path of the image rebuilt from WRITE commands only
pub const WRITES_OUTPUT: &str = "out_write.bin";

/// Options for one reconstruction run
#[derive(Debug, Clone)]
pub struct SniffOptions {
    /// Capture file
    pub input: PathBuf,
    /// Decoder and buffer configuration
    pub session: SessionConfig,
    /// All-sources image path
    pub output: PathBuf,
    /// Writes-only image path
    pub writes_output: PathBuf,
    /// Print the opcode summary table
    pub summary: bool,
    /// Access map graph path, if requested
    pub graph: Option<PathBuf>,
    /// Diagnostic verbosity (0-3)
    pub verbose: u8,
}

/// Prints per-transaction diagnostics according to verbosity
///
/// Re-access notes arrive while a transaction's bytes are applied, before
/// the transaction itself is finished. They are held back and printed under
/// the transaction's header line.
struct VerboseObserver {
    level: u8,
    pending: Vec<String>,
}

impl VerboseObserver {
    fn new(level: u8) -> Self {
        Self {
            level,
            pending: Vec::new(),
        }
    }

    fn transaction_lines(&mut self, summary: &TransactionSummary, image: &FlashImage) -> Vec<String> {
        let mut lines = Vec::new();
        if self.level == 0 {
            return lines;
        }

        lines.push(format!(
            "Time: {:.8}   Packet ID: {:5}  Command: 0x{:02x} - {}",
            summary.time,
            summary.id,
            summary.raw_opcode,
            summary.description().unwrap_or("Unknown")
        ));
        if let Some(id) = summary.jedec_id {
            lines.push(format!(" [+] Manufacturer ID: 0x{:02x}", id.manufacturer));
            lines.push(format!(
                " [+] Device ID: 0x{:02x} 0x{:02x}",
                id.device[0], id.device[1]
            ));
        }
        if let Some(id) = summary.device_id {
            lines.push(format!(" [+] Device ID: 0x{:02x}", id));
        }
        lines.append(&mut self.pending);

        if self.level < 2 {
            return lines;
        }
        if let Some(range) = summary.data.filter(|r| r.len > 0) {
            let start = range.base as usize;
            if let Some(data) = image.image().get(start..start + range.len as usize) {
                lines.extend(dump::data_lines(data, range.base));
            }
        }
        lines
    }
}

impl SessionObserver for VerboseObserver {
    fn transaction(&mut self, summary: &TransactionSummary, image: &FlashImage) {
        for line in self.transaction_lines(summary, image) {
            println!("{}", line);
        }
    }

    fn reaccess(&mut self, applied: &Applied) {
        if self.level > 2 {
            self.pending.push(format!(
                " [*] Memory address 0x{:02x} may have been accessed more than once ({} before). Perhaps it is important?",
                applied.address, applied.prior
            ));
        }
    }
}

fn create_progress_bar(total: u64, verbose: u8) -> Result<ProgressBar> {
    // Verbose output goes to stdout line by line; a bar would garble it
    if verbose > 0 {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) Parsing")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Decode a capture file into a session
pub fn decode_capture(input: &Path, config: SessionConfig, verbose: u8) -> Result<Session> {
    let open_err = |source: std::io::Error| SniffError::OpenCapture {
        path: input.to_path_buf(),
        source,
    };
    let file = File::open(input).map_err(open_err)?;
    let total = file.metadata().map_err(open_err)?.len();

    let pb = create_progress_bar(total, verbose)?;
    let mut reader = CaptureReader::new(BufReader::new(pb.wrap_read(file)));
    let mut session = Session::new(config);
    let mut observer = VerboseObserver::new(verbose);

    let result = session.run_with(&mut reader, &mut observer);
    pb.finish_and_clear();
    result?;

    log::debug!(
        "Read {} lines, skipped {} malformed rows",
        reader.lines_read(),
        reader.skipped()
    );
    Ok(session)
}

/// Write one output file
pub fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|source| SniffError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Run the full reconstruction: decode, trim, write, report
pub fn run_sniff(opts: &SniffOptions) -> Result<()> {
    let session = decode_capture(&opts.input, opts.session, opts.verbose)?;
    println!("Finished parsing input file");

    println!("Trimming pad bytes...\n");
    let image = session.image();
    let rebuilt = image.trimmed_image();
    let writes = image.trimmed_writes();

    write_output(&opts.output, rebuilt)?;
    write_output(&opts.writes_output, writes)?;

    report::print_report(session.stats(), rebuilt.len(), &opts.output);

    if opts.summary {
        report::print_summary(session.stats());
    }

    if let Some(path) = &opts.graph {
        println!("\nGenerating Graph...");
        let map = &image.access_map()[..rebuilt.len()];
        if graph::write_graph(path, map)? {
            println!("Graph saved to {}", path.display());
        }
    }

    Ok(())
}
