//! Hex dumps of transaction data

use colored::{Color, Colorize};

/// Bytes shown per dump row
const BYTES_PER_ROW: usize = 16;

/// Format `data` as hex + ASCII rows, addressed from `addr`
pub fn hex_dump(data: &[u8], addr: u64) -> Vec<String> {
    data.chunks(BYTES_PER_ROW)
        .enumerate()
        .map(|(i, row)| {
            let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = row
                .iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
                .collect();
            format!(
                "  0x{:08x}   {:47}   {}",
                addr + (i * BYTES_PER_ROW) as u64,
                hex.join(" "),
                ascii
            )
        })
        .collect()
}

/// Six-step size indicator for a transfer of `len` bytes
pub fn bargraph(len: u64) -> String {
    let (filled, color) = match len {
        0..=4 => (1, Color::Green),
        5..=8 => (2, Color::Green),
        9..=16 => (3, Color::Yellow),
        17..=32 => (4, Color::Yellow),
        33..=64 => (5, Color::Red),
        _ => (6, Color::Red),
    };
    format!(
        "[{}{}]",
        "*".repeat(filled).as_str().color(color),
        "-".repeat(6 - filled)
    )
}

/// Bargraph line followed by the dump of one transaction's data
pub fn data_lines(data: &[u8], addr: u64) -> Vec<String> {
    let mut lines = vec![format!(" {} {} bytes", bargraph(data.len() as u64), data.len())];
    lines.extend(hex_dump(data, addr));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_rows() {
        let data: Vec<u8> = (0x41..0x41 + 20).collect();
        let lines = hex_dump(&data, 0x100);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  0x00000100   41 42 43"));
        assert!(lines[0].ends_with("ABCDEFGHIJKLMNOP"));
        assert!(lines[1].starts_with("  0x00000110   51 52 53 54"));
        assert!(lines[1].ends_with("QRST"));
    }

    #[test]
    fn test_hex_dump_nonprintable() {
        let lines = hex_dump(&[0x00, 0x7F, 0x20], 0);
        assert!(lines[0].ends_with(". "));
    }

    #[test]
    fn test_bargraph_buckets() {
        colored::control::set_override(false);
        assert_eq!(bargraph(1), "[*-----]");
        assert_eq!(bargraph(8), "[**----]");
        assert_eq!(bargraph(16), "[***---]");
        assert_eq!(bargraph(32), "[****--]");
        assert_eq!(bargraph(64), "[*****-]");
        assert_eq!(bargraph(65), "[******]");
    }
}
