use std::cmp::Ordering;
use std::io::Write;

use anyhow::{anyhow, Context};

use crate::natural_key::NaturalKey;

/// A staged line and the id the store assigned to it.
///
/// Records order by the natural key of the line, then by id, which makes the order total even for
/// duplicate lines.
#[derive(Debug)]
pub(crate) struct LineRecord {
    id: u64,
    line: String,
}

impl LineRecord {
    pub(crate) fn new(id: u64, line: String) -> LineRecord {
        LineRecord {
            id,
            line,
        }
    }

    /// Parse a record from its run file form `<id>\t<line>`, the line terminator already removed.
    pub(crate) fn decode(encoded: &str) -> Result<LineRecord, anyhow::Error> {
        let (id, line) = encoded.split_once('\t')
            .ok_or_else(|| anyhow!("Malformed staged record, missing id separator: {encoded}"))?;
        let id = id.parse::<u64>()
            .with_context(|| format!("Malformed staged record id: {id}"))?;
        Ok(LineRecord::new(id, line.to_string()))
    }

    pub(crate) fn encode(&self, writer: &mut impl Write) -> Result<(), anyhow::Error> {
        writeln!(writer, "{}\t{}", self.id, self.line)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn line(self) -> String {
        self.line
    }

    fn key(&self) -> NaturalKey<'_> {
        NaturalKey::new(self.line.as_str())
    }
}

impl Eq for LineRecord {}

impl PartialEq<Self> for LineRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd<Self> for LineRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
            .then_with(|| self.id.cmp(&other.id))
    }
}
