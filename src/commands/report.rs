//! Run report and opcode summary table

use sniffrom_core::stats::Statistics;
use std::path::Path;

const TABLE_RULE: &str =
    "+---------+-----------+-----------------------------------------------------------+";

/// Percentage of the rebuilt image that was actually observed
pub fn coverage(discovered: u64, image_len: usize) -> f64 {
    if image_len == 0 {
        0.0
    } else {
        discovered as f64 / image_len as f64 * 100.0
    }
}

/// Print the rebuilt image size and capture coverage
pub fn print_report(stats: &Statistics, image_len: usize, output: &Path) {
    println!(
        "Rebuilt image: {} bytes (saved to {})",
        image_len,
        output.display()
    );
    println!(
        "Captured data: {} bytes ({:.2}%) ({} bytes from WRITE commands)",
        stats.bytes_discovered(),
        coverage(stats.bytes_discovered(), image_len),
        stats.bytes_written()
    );
}

/// Format the opcode/instances/description table
pub fn summary_table(stats: &Statistics) -> Vec<String> {
    let mut lines = vec![
        TABLE_RULE.to_string(),
        format!("| Command | Instances | {:57} |", "Description"),
        TABLE_RULE.to_string(),
    ];
    for row in stats.rows() {
        let command = match row.opcode {
            Some(op) => format!("0x{:02x}", op),
            None => "Unknown".to_string(),
        };
        lines.push(format!(
            "| {:7} | {:9} | {:57} |",
            command, row.count, row.description
        ));
    }
    lines.push(TABLE_RULE.to_string());
    lines
}

/// Print identification data and the summary table
pub fn print_summary(stats: &Statistics) {
    println!("\nSummary:\n");
    if let Some(id) = stats.jedec_id() {
        println!("Manufacturer ID: 0x{:02x}", id.manufacturer);
        println!("Device ID: 0x{:02x} 0x{:02x}\n", id.device[0], id.device[1]);
    }
    if let Some(id) = stats.device_id() {
        println!("Device ID: 0x{:02x}\n", id);
    }
    for line in summary_table(stats) {
        println!("{}", line);
    }
}
