use anyhow::{Context, Result};
use std::io::{BufReader, Read};

use crate::decode::{Records, Schema};

/// What an input file contains, gathered in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    pub schema: Schema,
    pub records: u64,
    pub skipped: u64,
    pub first: Option<String>,
    pub last: Option<String>,
    /// Smallest and largest timestamp; exports are not always sorted
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

pub fn summarize<R: Read>(input: R) -> Result<InputSummary> {
    let mut records =
        Records::open(BufReader::new(input)).context("failed to locate location records")?;
    let mut summary = InputSummary {
        schema: records.schema(),
        records: 0,
        skipped: 0,
        first: None,
        last: None,
        earliest: None,
        latest: None,
    };

    for record in records.by_ref() {
        let loc = record.with_context(|| format!("input is corrupt after {} records", summary.records))?;
        summary.records += 1;
        if summary.first.is_none() {
            summary.first = Some(loc.timestamp.clone());
        }
        if summary.earliest.as_ref().is_none_or(|e| loc.timestamp < *e) {
            summary.earliest = Some(loc.timestamp.clone());
        }
        if summary.latest.as_ref().is_none_or(|l| loc.timestamp > *l) {
            summary.latest = Some(loc.timestamp.clone());
        }
        summary.last = Some(loc.timestamp);
    }
    summary.skipped = records.skipped();
    Ok(summary)
}

pub fn inspect_input(path: &str) -> Result<()> {
    let summary = crate::input::with_input(path, |input| summarize(input))?;
    let dash = "-";

    println!("Input: {}", path);
    println!("Schema: {}", summary.schema);
    println!("Records: {}, Skipped: {}\n", summary.records, summary.skipped);

    println!("{:<10} {:<32}", "", "Timestamp");
    println!("{}", "-".repeat(43));
    println!("{:<10} {:<32}", "First", summary.first.as_deref().unwrap_or(dash));
    println!("{:<10} {:<32}", "Last", summary.last.as_deref().unwrap_or(dash));
    println!("{:<10} {:<32}", "Earliest", summary.earliest.as_deref().unwrap_or(dash));
    println!("{:<10} {:<32}", "Latest", summary.latest.as_deref().unwrap_or(dash));

    Ok(())
}
