//! Text output of acquisitions: CSV tables and hex dumps.

use std::io::{self, Write};

/// Header record of the CSV output.
pub const CSV_HEADER: [&str; 2] = ["Wavelength (nm)", "Intensity (counts)"];

const HEXDUMP_ROW: usize = 16;

/// Write `(wavelength, intensity)` pairs as CSV.
pub fn write_csv<W, I>(out: W, points: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for (wavelength, intensity) in points {
        writer.write_record([format!("{:.4}", wavelength), format!("{:.4}", intensity)])?;
    }
    writer.flush()
}

/// Hex dump with an offset column and a printable-ASCII gutter.
pub fn write_hexdump<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    for (row, chunk) in data.chunks(HEXDUMP_ROW).enumerate() {
        write!(out, "{:08x} |", row * HEXDUMP_ROW)?;
        for i in 0..HEXDUMP_ROW {
            match chunk.get(i) {
                Some(b) => write!(out, " {:02x}", b)?,
                None => write!(out, "   ")?,
            }
        }
        write!(out, " | ")?;
        for i in 0..HEXDUMP_ROW {
            let c = match chunk.get(i) {
                Some(&b) if b.is_ascii_graphic() || b == b' ' => b as char,
                Some(_) => '.',
                None => ' ',
            };
            write!(out, "{}", c)?;
        }
        writeln!(out, " |")?;
    }
    Ok(())
}
