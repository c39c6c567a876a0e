//! Energy trace dump.
//!
//! One value per iteration, whitespace separated, for offline plotting of
//! chain convergence.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Write an energy trace to the given sink.
pub fn write<W: Write>(writer: &mut W, energies: &[f64]) -> Result<()> {
    for (i, energy) in energies.iter().enumerate() {
        if i > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{:.6}", energy)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write an energy trace to a file.
pub fn save<P: AsRef<Path>>(path: P, energies: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, energies)?;
    writer.flush()?;
    Ok(())
}
