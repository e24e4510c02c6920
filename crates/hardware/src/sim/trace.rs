//! Memory trace parsing.
//!
//! Each line of a trace describes one memory access:
//!
//! ```text
//! <marker> <0|1> <hex address> <instruction count>
//! # 0 7fffed80 1
//! # 1 10010000 10
//! ```
//!
//! The marker is a single character that is carried through but otherwise
//! ignored, `0` is a load and `1` a store, the address is hexadecimal with an
//! optional `0x` prefix, and the instruction count is the number of
//! instructions executed since the previous access, this one included.
//! Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::addr::PhysAddr;
use crate::common::data::AccessType;
use crate::common::error::TraceError;

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Leading marker character, as found in the trace.
    pub marker: char,
    /// Load or store.
    pub access: AccessType,
    /// Accessed address.
    pub addr: PhysAddr,
    /// Instructions attributed to this access.
    pub instructions: u64,
}

/// Parses a single non-blank trace line. `line_no` is only used in errors.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] if the line does not have exactly four
/// fields or any field fails to parse.
pub fn parse_line(line: &str, line_no: usize) -> Result<TraceRecord, TraceError> {
    let mut fields = line.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| TraceError::malformed(line_no, format!("missing {what}")))
    };

    let marker_field = next("marker")?;
    let mut marker_chars = marker_field.chars();
    let marker = match (marker_chars.next(), marker_chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(TraceError::malformed(
                line_no,
                format!("marker `{marker_field}` is not a single character"),
            ));
        }
    };

    let access_field = next("access type")?;
    let access = access_field
        .parse::<u64>()
        .ok()
        .and_then(|code| AccessType::try_from(code).ok())
        .ok_or_else(|| {
            TraceError::malformed(line_no, format!("access type `{access_field}` is not 0 or 1"))
        })?;

    let addr_field = next("address")?;
    let digits = addr_field
        .strip_prefix("0x")
        .or_else(|| addr_field.strip_prefix("0X"))
        .unwrap_or(addr_field);
    let addr = u64::from_str_radix(digits, 16).map_err(|e| {
        TraceError::malformed(line_no, format!("address `{addr_field}`: {e}"))
    })?;

    let count_field = next("instruction count")?;
    let instructions = count_field.parse::<u64>().map_err(|e| {
        TraceError::malformed(line_no, format!("instruction count `{count_field}`: {e}"))
    })?;

    if let Some(extra) = fields.next() {
        return Err(TraceError::malformed(
            line_no,
            format!("unexpected trailing field `{extra}`"),
        ));
    }

    Ok(TraceRecord {
        marker,
        access,
        addr: PhysAddr(addr),
        instructions,
    })
}

/// Streaming reader yielding one [`TraceRecord`] per non-blank line.
#[derive(Debug)]
pub struct TraceReader<R> {
    input: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps any buffered reader, e.g. `stdin().lock()` or a `BufReader<File>`.
    pub const fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far, blank ones included.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(parse_line(line, self.line_no));
                }
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
        }
    }
}

/// Opens a trace file for reading.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened.
pub fn open(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, TraceError> {
    let file = File::open(path.as_ref())?;
    Ok(TraceReader::new(BufReader::new(file)))
}
