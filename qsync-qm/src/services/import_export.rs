//! JSON import/export of the quote collection
//!
//! Export is a pretty-printed JSON array. Import validates each record (text
//! and category must be non-empty strings after trimming) and discards the
//! rest; a payload that is not an array or yields no valid record is rejected
//! wholesale so no partial mutation occurs.

use serde_json::Value;

use qsync_common::{Error, Quote, Result};

/// How imported records are applied to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Collection becomes exactly the valid imported records
    Replace,
    /// Valid records with a new normalized text are appended
    Merge,
}

/// Result of parsing an import payload
#[derive(Debug, Clone)]
pub struct ParsedImport {
    /// Valid records, in payload order
    pub quotes: Vec<Quote>,
    /// Records discarded for missing/empty/non-string fields
    pub skipped_invalid: usize,
}

/// Serialize the collection as a pretty JSON array
pub fn export_json(quotes: &[Quote]) -> Result<String> {
    serde_json::to_string_pretty(quotes)
        .map_err(|e| Error::Internal(format!("Export serialization failed: {}", e)))
}

/// Parse and validate an import payload
pub fn parse_import(payload: &str) -> Result<ParsedImport> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::InvalidInput(format!("Import is not valid JSON: {}", e)))?;

    let Value::Array(records) = value else {
        return Err(Error::InvalidInput(
            "Import must be a JSON array of quotes".to_string(),
        ));
    };

    let total = records.len();
    let quotes: Vec<Quote> = records
        .into_iter()
        .filter_map(|record| {
            let text = record.get("text")?.as_str()?;
            let category = record.get("category")?.as_str()?;
            let quote = Quote::new(text, category);
            quote.is_valid().then_some(quote)
        })
        .collect();

    if quotes.is_empty() {
        return Err(Error::InvalidInput(
            "Import contains no valid quotes".to_string(),
        ));
    }

    Ok(ParsedImport {
        skipped_invalid: total - quotes.len(),
        quotes,
    })
}
