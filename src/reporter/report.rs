//! Report accumulation.

use crate::domain::{DecodeOutcome, DecodedRecord};

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// 1-based row number over decoded frames only
    pub number: usize,
    pub record: DecodedRecord,
}

/// Rows for every decoded frame plus a count of frames that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReportRow>,
    unprocessed: usize,
}

impl Report {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Frames whose Ethernet or IPv4 layer failed.
    pub fn unprocessed(&self) -> usize {
        self.unprocessed
    }

    /// Every frame that went into the report, rendered or not.
    pub fn total_frames(&self) -> usize {
        self.rows.len() + self.unprocessed
    }
}

/// Accumulates decode outcomes in capture order.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one outcome. Outcomes must arrive in capture order.
    pub fn push(&mut self, outcome: DecodeOutcome) {
        match outcome {
            DecodeOutcome::Complete(record) | DecodeOutcome::PartialTransport(record) => {
                let number = self.report.rows.len() + 1;
                self.report.rows.push(ReportRow { number, record });
            }
            DecodeOutcome::Unprocessed(_) => self.report.unprocessed += 1,
        }
    }

    pub fn finish(self) -> Report {
        self.report
    }

    /// Build a report from a full outcome sequence.
    pub fn build<I>(outcomes: I) -> Report
    where
        I: IntoIterator<Item = DecodeOutcome>,
    {
        let mut builder = Self::new();
        for outcome in outcomes {
            builder.push(outcome);
        }
        builder.finish()
    }
}
