//! Benchmark sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{BenchmarkSample, Comparison, ResultRecorder};
use crate::error::Result;

/// Writes the CSV header once, then one line per recorded sample.
pub struct CsvRecorder<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvRecorder<BufWriter<File>> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ResultRecorder for CsvRecorder<W> {
    fn record(&mut self, sample: &BenchmarkSample) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", BenchmarkSample::csv_header())?;
            self.header_written = true;
        }
        writeln!(self.writer, "{}", sample.to_csv_line())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects samples in memory.
impl ResultRecorder for Vec<BenchmarkSample> {
    fn record(&mut self, sample: &BenchmarkSample) -> Result<()> {
        self.push(sample.clone());
        Ok(())
    }
}

/// Forwards to two recorders, e.g. a CSV file and a console printer.
pub struct Tee<'a> {
    pub first: &'a mut dyn ResultRecorder,
    pub second: &'a mut dyn ResultRecorder,
}

impl ResultRecorder for Tee<'_> {
    fn record(&mut self, sample: &BenchmarkSample) -> Result<()> {
        self.first.record(sample)?;
        self.second.record(sample)
    }

    fn compare(&mut self, comparison: &Comparison) -> Result<()> {
        self.first.compare(comparison)?;
        self.second.compare(comparison)
    }
}
