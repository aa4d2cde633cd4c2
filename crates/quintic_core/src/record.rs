use std::io::Write;

use crate::exact::exact_solution;

/// One line of the result file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub time: f64,
    pub numerical: f64,
    pub exact: f64,
    pub abs_error: f64,
}

impl Record {
    pub fn new(time: f64, numerical: f64) -> Self {
        let exact = exact_solution(time);
        Self {
            time,
            numerical,
            exact,
            abs_error: (numerical - exact).abs(),
        }
    }

    /// `time\tnumerical\texact\tabs_error`, each in `%e` notation.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            format_scientific(self.time),
            format_scientific(self.numerical),
            format_scientific(self.exact),
            format_scientific(self.abs_error)
        )
    }
}

/// Formats like C's `%e`: six fractional digits, signed exponent of at least
/// two digits (`-1.234568e-05`).
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let raw = format!("{:.6e}", value);
    let (mantissa, exponent) = match raw.split_once('e') {
        Some(parts) => parts,
        None => return raw,
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Writes records line by line to any sink.
pub struct RecordWriter<W: Write> {
    sink: W,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    pub fn write(&mut self, record: &Record) -> std::io::Result<()> {
        writeln!(self.sink, "{}", record.to_line())?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
