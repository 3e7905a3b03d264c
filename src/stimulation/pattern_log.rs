// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use std::io::{self, Write};

/// One row of the pattern log: what a single bar did and when.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRecord {
    /// 1-based phrase number.
    pub cycle: usize,
    /// 1-based bar number within the phrase, counting OFF bars too.
    pub bar: usize,
    /// The finger ordering, or None for a silent bar.
    pub pattern: Option<Permutation>,
    /// Where the bar starts in the rendered audio.
    pub sample_time: Seconds,
    /// Where the bar starts on the nominal (unjittered) clock.
    pub prog_time: Seconds,
}

/// Writes [BarRecord]s as CSV. Pass `std::io::sink()` to discard them.
#[derive(Debug)]
pub struct PatternLog<W: Write> {
    sink: W,
    rows: usize,
}
impl<W: Write> PatternLog<W> {
    /// The header row.
    pub const HEADER: &'static str = r#""Cycle","Bar","Pattern","SampleTime","ProgTime""#;

    /// Writes the header row and returns a log ready for records.
    pub fn new(mut sink: W) -> io::Result<Self> {
        writeln!(sink, "{}", Self::HEADER)?;
        Ok(Self { sink, rows: 0 })
    }

    /// Appends one row. Silent bars log pattern -1.
    pub fn record(&mut self, record: &BarRecord) -> io::Result<()> {
        let pattern = record.pattern.map_or(-1, |p| p.index() as i64);
        writeln!(
            self.sink,
            "{},{},{},{:.6},{:.6}",
            record.cycle, record.bar, pattern, record.sample_time.0, record.prog_time.0
        )?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, not counting the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and gives back the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_header() {
        let mut log = PatternLog::new(Vec::new()).unwrap();
        log.record(&BarRecord {
            cycle: 1,
            bar: 2,
            pattern: Permutation::from_index(17),
            sample_time: Seconds(0.6666666),
            prog_time: Seconds(2.0 / 3.0),
        })
        .unwrap();
        log.record(&BarRecord {
            cycle: 1,
            bar: 4,
            pattern: None,
            sample_time: Seconds(2.0),
            prog_time: Seconds(2.0),
        })
        .unwrap();
        assert_eq!(log.rows(), 2);
        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "\"Cycle\",\"Bar\",\"Pattern\",\"SampleTime\",\"ProgTime\"\n\
             1,2,17,0.666667,0.666667\n\
             1,4,-1,2.000000,2.000000\n"
        );
    }
}
