//! Offset table construction from the line-paired crossref format

use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

/// Byte span `[start, end)` of a payload within its backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Symbol name to payload span
pub type OffsetTable = HashMap<String, Span>;

/// Build the offset table for a crossref buffer.
///
/// Lines alternate symbol, payload. Each payload span starts right after its
/// symbol line and covers the payload with trailing whitespace removed. A
/// repeated symbol keeps its last span. An unpaired final symbol line is
/// dropped.
pub fn build_offset_table(buf: &[u8]) -> OffsetTable {
    let mut table = OffsetTable::new();
    let mut pending: Option<String> = None;
    let mut pos = 0usize;

    for line in buf.split_inclusive(|&b| b == b'\n') {
        match pending.take() {
            None => {
                pos += line.len();
                pending = Some(String::from_utf8_lossy(trim_end(line)).into_owned());
            }
            Some(symbol) => {
                let value_len = trim_end(line).len();
                table.insert(
                    symbol,
                    Span {
                        start: pos,
                        end: pos + value_len,
                    },
                );
                pos += line.len();
            }
        }
    }

    if let Some(symbol) = pending {
        debug!("Dropping unpaired trailing symbol {:?}", symbol);
    }

    table
}

fn trim_end(line: &[u8]) -> &[u8] {
    let keep = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..keep]
}
