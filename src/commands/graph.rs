//! Access map export
//!
//! Renders the access map row-major as a binary PPM image: one pixel per
//! flash byte, one row per `GRAPH_BYTES_PER_ROW` bytes.

use sniffrom_core::image::Access;
use std::fs;
use std::path::Path;

use crate::error::{Result, SniffError};

/// Flash bytes per image row
pub const GRAPH_BYTES_PER_ROW: usize = 2048;

fn color(access: Access) -> [u8; 3] {
    match access {
        Access::Unaccessed => [0x00, 0x00, 0x00],
        Access::Read => [0x00, 0x00, 0xFF],
        Access::Written => [0xFF, 0x00, 0x00],
    }
}

/// Render `map` as a P6 image `width` pixels wide
///
/// A trailing partial row is padded with unaccessed pixels.
pub fn render_ppm(map: &[Access], width: usize) -> Vec<u8> {
    let rows = map.len().div_ceil(width);
    let mut out = format!("P6\n{} {}\n255\n", width, rows).into_bytes();
    out.reserve(rows * width * 3);
    for i in 0..rows * width {
        out.extend_from_slice(&color(map.get(i).copied().unwrap_or_default()));
    }
    out
}

/// Write the access map graph to `path`
///
/// Returns false when there is nothing to draw.
pub fn write_graph(path: &Path, map: &[Access]) -> Result<bool> {
    if map.is_empty() {
        log::warn!("Image is empty, no graph generated");
        return Ok(false);
    }

    let ppm = render_ppm(map, GRAPH_BYTES_PER_ROW);
    fs::write(path, ppm).map_err(|source| SniffError::GraphWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ppm() {
        let map = [Access::Unaccessed, Access::Read, Access::Written];
        let ppm = render_ppm(&map, 2);
        let header = b"P6\n2 2\n255\n";
        assert_eq!(&ppm[..header.len()], header);
        let pixels = &ppm[header.len()..];
        assert_eq!(pixels.len(), 4 * 3);
        assert_eq!(&pixels[0..3], &[0, 0, 0]);
        assert_eq!(&pixels[3..6], &[0, 0, 0xFF]);
        assert_eq!(&pixels[6..9], &[0xFF, 0, 0]);
        // padding
        assert_eq!(&pixels[9..12], &[0, 0, 0]);
    }

    #[test]
    fn test_write_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.ppm");
        assert!(!write_graph(&path, &[]).unwrap());
        assert!(!path.exists());

        let map = vec![Access::Read; GRAPH_BYTES_PER_ROW + 1];
        assert!(write_graph(&path, &map).unwrap());
        let data = fs::read(&path).unwrap();
        assert!(data.starts_with(b"P6\n2048 2\n255\n"));
    }
}
