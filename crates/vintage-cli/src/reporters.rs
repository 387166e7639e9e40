//! Console implementations of the benchmark status and result hooks.

use std::io::{self, Stdout, Write};

use vintage_core::benchmark::{BenchmarkSample, Comparison, ResultRecorder, StatusReporter};

/// Prints one progress line per status update.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn report(&self, message: &str, percent: u8) {
        println!("[{:>3}%] {}", percent, message);
    }
}

/// Writes per-backend averages and the comparison block for each pair.
pub struct ConsoleRecorder<W: Write = Stdout> {
    out: W,
}

impl ConsoleRecorder<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultRecorder for ConsoleRecorder<W> {
    fn record(&mut self, sample: &BenchmarkSample) -> vintage_core::Result<()> {
        writeln!(
            self.out,
            "       {:<8} avg {:>9.2}ms  sd {:>7.2}ms",
            sample.backend.tag(),
            sample.mean_ms,
            sample.std_dev_ms
        )?;
        Ok(())
    }

    fn compare(&mut self, comparison: &Comparison) -> vintage_core::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", comparison.summary())?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
