//! Image renders of occupancies and marginals.
//!
//! Binary PGM (grayscale) for marginal heat maps — darker means more likely
//! occupied, scaled by the largest marginal — and binary PPM (RGB) for
//! occupancy snapshots, with an optional highlighted-cell list drawn in
//! green so a human can see which beam is under inspection. Observational
//! output only; nothing here is read back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::types::{Marginals, Occupancy};
use crate::error::{Error, Result};

const OCCUPIED_RGB: [u8; 3] = [0, 0, 0];
const FREE_RGB: [u8; 3] = [255, 255, 255];
const HIGHLIGHT_RGB: [u8; 3] = [0, 255, 0];

/// Render marginals as a binary PGM heat map.
pub fn write_marginals_pgm<W: Write>(writer: &mut W, marginals: &Marginals) -> Result<()> {
    writeln!(writer, "P5")?;
    writeln!(writer, "{} {}", marginals.width(), marginals.height())?;
    writeln!(writer, "255")?;

    let max = marginals.max();
    let pixels: Vec<u8> = marginals
        .as_slice()
        .iter()
        .map(|&v| {
            if max > 0.0 {
                ((max - v) * 255.0 / max) as u8
            } else {
                255
            }
        })
        .collect();
    writer.write_all(&pixels)?;
    Ok(())
}

/// Render marginals as a PGM file.
pub fn save_marginals_pgm<P: AsRef<Path>>(path: P, marginals: &Marginals) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_marginals_pgm(&mut writer, marginals)?;
    writer.flush()?;
    Ok(())
}

/// Render an occupancy snapshot as a binary PPM.
///
/// Occupied cells are black, free cells white, and every cell listed in
/// `highlighted` is drawn green on top. The occupancy must cover exactly
/// `width * height` cells; highlighted indices outside the grid are
/// rejected.
pub fn write_occupancy_ppm<W: Write>(
    writer: &mut W,
    occupancy: &Occupancy,
    width: usize,
    height: usize,
    highlighted: &[usize],
) -> Result<()> {
    let cell_count = width * height;
    if occupancy.len() != cell_count {
        return Err(Error::OccupancySizeMismatch {
            actual: occupancy.len(),
            expected: cell_count,
        });
    }
    if let Some(&index) = highlighted.iter().find(|&&c| c >= cell_count) {
        return Err(Error::BeamCellOutOfRange { index, cell_count });
    }

    writeln!(writer, "P6")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    let mut pixels = Vec::with_capacity(cell_count * 3);
    for state in occupancy.iter() {
        let rgb = if state.is_occupied() {
            OCCUPIED_RGB
        } else {
            FREE_RGB
        };
        pixels.extend_from_slice(&rgb);
    }
    for &cell in highlighted {
        pixels[cell * 3..cell * 3 + 3].copy_from_slice(&HIGHLIGHT_RGB);
    }
    writer.write_all(&pixels)?;
    Ok(())
}

/// Render an occupancy snapshot as a PPM file.
pub fn save_occupancy_ppm<P: AsRef<Path>>(
    path: P,
    occupancy: &Occupancy,
    width: usize,
    height: usize,
    highlighted: &[usize],
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_occupancy_ppm(&mut writer, occupancy, width, height, highlighted)?;
    writer.flush()?;
    Ok(())
}
