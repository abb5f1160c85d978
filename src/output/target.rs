use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Output name meaning standard output
pub const STDOUT_TARGET: &str = "-";

/// Where the report is written. A file opened here is closed when the
/// stream is dropped; standard output is left open.
pub enum OutputStream {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

/// Open the report destination: `-` for standard output, otherwise a file
/// created (or truncated) for this run
pub fn open_output(target: &str) -> Result<OutputStream> {
    if target == STDOUT_TARGET {
        return Ok(OutputStream::Stdout(io::stdout()));
    }

    let path = Path::new(target);
    let file = File::create(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    Ok(OutputStream::File(BufWriter::new(file)))
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Stdout(out) => out.write(buf),
            OutputStream::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout(out) => out.flush(),
            OutputStream::File(file) => file.flush(),
        }
    }
}
