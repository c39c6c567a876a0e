//! Marginals text dump.
//!
//! Format: first line `width height`, second line the per-cell occupied
//! fractions in row-major order, whitespace separated.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::types::Marginals;
use crate::error::Result;

/// Write a marginals dump to the given sink.
pub fn write<W: Write>(writer: &mut W, marginals: &Marginals) -> Result<()> {
    writeln!(writer, "{} {}", marginals.width(), marginals.height())?;
    for (i, value) in marginals.as_slice().iter().enumerate() {
        if i > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{:.6}", value)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write a marginals dump to a file.
pub fn save<P: AsRef<Path>>(path: P, marginals: &Marginals) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, marginals)?;
    writer.flush()?;
    Ok(())
}

/// Read a marginals dump produced by [`write`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Marginals> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    read(reader)
}

/// Read a marginals dump from the given source.
pub fn read<R: BufRead>(mut reader: R) -> Result<Marginals> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let mut dims = header.split_whitespace();
    let width = parse_usize(dims.next(), "width")?;
    let height = parse_usize(dims.next(), "height")?;

    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    let values = body
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| invalid_data(format!("bad marginal value `{}`", token)))
        })
        .collect::<std::result::Result<Vec<f64>, std::io::Error>>()?;

    if values.len() != width * height {
        return Err(invalid_data(format!(
            "expected {} values for a {}x{} grid, found {}",
            width * height,
            width,
            height,
            values.len()
        ))
        .into());
    }

    Ok(Marginals::new(width, height, values))
}

fn parse_usize(token: Option<&str>, what: &str) -> std::result::Result<usize, std::io::Error> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| invalid_data(format!("missing or bad {} in header", what)))
}

fn invalid_data(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}
