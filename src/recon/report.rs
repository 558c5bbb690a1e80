//! Daily settlement report reader.
//!
//! A report is [`SECTION_COUNT`] sections, each laid out as
//!
//! ```text
//! <header text> (<count>) <header text>
//! <count> record lines
//! <blank separator>
//! ```
//!
//! The header count decides how many lines belong to the section, so every
//! section has to be consumed in order to keep the cursor aligned.

use serde::Serialize;
use std::io::BufRead;

use super::error::ParseError;
use super::normalize::{parse_record, RawRecord};

pub const SECTION_COUNT: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    /// Received by the clearing network successfully.
    ClearingReceived,
    ClearingSent,
    ClearingOther,
    GatewaySubmitted,
    GatewaySucceeded,
    GatewayOther,
    LedgerCreated,
    LedgerSubmitted,
    LedgerSucceeded,
    LedgerOther,
    ClearingVsLedger,
    ClearingVsGatewaySameStatus,
    ClearingVsGatewayDifferentStatus,
    GatewayVsLedgerSubmitted,
}

impl ReportSection {
    /// Sections in file order.
    pub const ALL: [ReportSection; SECTION_COUNT] = [
        ReportSection::ClearingReceived,
        ReportSection::ClearingSent,
        ReportSection::ClearingOther,
        ReportSection::GatewaySubmitted,
        ReportSection::GatewaySucceeded,
        ReportSection::GatewayOther,
        ReportSection::LedgerCreated,
        ReportSection::LedgerSubmitted,
        ReportSection::LedgerSucceeded,
        ReportSection::LedgerOther,
        ReportSection::ClearingVsLedger,
        ReportSection::ClearingVsGatewaySameStatus,
        ReportSection::ClearingVsGatewayDifferentStatus,
        ReportSection::GatewayVsLedgerSubmitted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSection::ClearingReceived => "clearing_received",
            ReportSection::ClearingSent => "clearing_sent",
            ReportSection::ClearingOther => "clearing_other",
            ReportSection::GatewaySubmitted => "gateway_submitted",
            ReportSection::GatewaySucceeded => "gateway_succeeded",
            ReportSection::GatewayOther => "gateway_other",
            ReportSection::LedgerCreated => "ledger_created",
            ReportSection::LedgerSubmitted => "ledger_submitted",
            ReportSection::LedgerSucceeded => "ledger_succeeded",
            ReportSection::LedgerOther => "ledger_other",
            ReportSection::ClearingVsLedger => "clearing_vs_ledger",
            ReportSection::ClearingVsGatewaySameStatus => "clearing_vs_gateway_same_status",
            ReportSection::ClearingVsGatewayDifferentStatus => {
                "clearing_vs_gateway_different_status"
            }
            ReportSection::GatewayVsLedgerSubmitted => "gateway_vs_ledger_submitted",
        }
    }
}

pub struct ReportReader<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> ReportReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    /// Lines consumed so far.
    pub fn lines_consumed(&self) -> usize {
        self.line
    }

    /// Read the next section: header, counted records, separator.
    pub fn next_section(&mut self) -> Result<Vec<RawRecord>, ParseError> {
        let header = self
            .read_line()?
            .ok_or(ParseError::UnexpectedEof { line: self.line + 1 })?;
        let count = parse_count(&header, self.line)?;

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self
                .read_line()?
                .ok_or(ParseError::UnexpectedEof { line: self.line + 1 })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = parse_record(&line).map_err(|source| ParseError::Record {
                line: self.line,
                source: Box::new(source),
            })?;
            records.push(record);
        }

        // The last section may end without a separator.
        if let Some(separator) = self.read_line()? {
            if !separator.trim().is_empty() {
                return Err(ParseError::MissingSeparator {
                    line: self.line,
                    found: separator,
                });
            }
        }

        Ok(records)
    }

    fn read_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(&['\n', '\r'][..]).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }
}

/// Record count declared by the first parenthesised group of a header.
fn parse_count(header: &str, line: usize) -> Result<usize, ParseError> {
    let missing = || ParseError::MissingCount {
        line,
        header: header.to_string(),
    };
    let open = header.find('(').ok_or_else(missing)?;
    let len = header[open + 1..].find(')').ok_or_else(missing)?;
    let value = header[open + 1..open + 1 + len].trim();

    value.parse().map_err(|_| ParseError::InvalidCount {
        line,
        value: value.to_string(),
    })
}
