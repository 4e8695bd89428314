//! # Catalog CSV Import
//!
//! Parsing for the bulk-import file format:
//!
//! ```text
//! sku,name,category_id,cost_price,price,reseller_price,stock
//! AGL-001,Aglonema Suksom,<category-uuid>,35000,55000,50000,10
//! ```
//!
//! The format is comma-split with no quoting or escaping — a field
//! containing a comma cannot be represented. That is the documented
//! contract of the template file, so this parser accepts exactly that
//! language rather than pulling in a general CSV reader.
//!
//! Malformed rows do not become NaN-shaped records: every bad field is
//! reported with its line number, and the caller imports nothing unless
//! the whole file parses.

use thiserror::Error;

use crate::types::NewProduct;
use crate::validation::{validate_product_name, validate_sku};

/// The exact header row the template ships with.
pub const CSV_HEADER: &str = "sku,name,category_id,cost_price,price,reseller_price,stock";

/// Returns the downloadable template: header plus one example row.
pub fn csv_template() -> String {
    format!("{CSV_HEADER}\nAGL-001,Aglonema Suksom,PASTE_CATEGORY_ID_HERE,35000,55000,50000,10\n")
}

// =============================================================================
// Errors
// =============================================================================

/// A single rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {field}: {reason}")]
pub struct RowError {
    /// 1-based line number in the file (the header is line 1).
    pub line: usize,
    pub field: &'static str,
    pub reason: String,
}

/// File-level parse failure.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file is empty or contains only blank lines.
    #[error("file is empty")]
    Empty,

    /// The first line is not the expected header.
    #[error("unexpected header '{found}', expected the template header")]
    HeaderMismatch { found: String },

    /// One or more rows were rejected. The import inserts nothing.
    #[error("{} row(s) rejected", .0.len())]
    Rows(Vec<RowError>),
}

// =============================================================================
// Parser
// =============================================================================

/// Parses the whole file into typed product rows.
///
/// All row errors are collected and returned together so the operator can
/// fix the file in one pass.
pub fn parse_catalog_csv(text: &str) -> Result<Vec<NewProduct>, CsvError> {
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, l)) if l.trim().is_empty() => continue,
            Some((_, l)) => break l,
            None => return Err(CsvError::Empty),
        }
    };

    if header.trim() != CSV_HEADER {
        return Err(CsvError::HeaderMismatch {
            found: header.trim().to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in lines {
        let line_no = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        match parse_row(raw, line_no) {
            Ok(row) => rows.push(row),
            Err(mut row_errors) => errors.append(&mut row_errors),
        }
    }

    if !errors.is_empty() {
        return Err(CsvError::Rows(errors));
    }

    if rows.is_empty() {
        return Err(CsvError::Empty);
    }

    Ok(rows)
}

/// Parses one data row, collecting every bad field.
fn parse_row(raw: &str, line: usize) -> Result<NewProduct, Vec<RowError>> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();

    if fields.len() != 7 {
        return Err(vec![RowError {
            line,
            field: "row",
            reason: format!("expected 7 columns, found {}", fields.len()),
        }]);
    }

    let mut errors = Vec::new();

    let sku = fields[0].to_string();
    if let Err(e) = validate_sku(&sku) {
        errors.push(RowError {
            line,
            field: "sku",
            reason: e.to_string(),
        });
    }

    let name = fields[1].to_string();
    if let Err(e) = validate_product_name(&name) {
        errors.push(RowError {
            line,
            field: "name",
            reason: e.to_string(),
        });
    }

    let category_id = fields[2].to_string();
    if category_id.is_empty() {
        errors.push(RowError {
            line,
            field: "category_id",
            reason: "is required".to_string(),
        });
    }

    let cost_price_rp = parse_amount(fields[3], "cost_price", line, &mut errors);
    let price_rp = parse_amount(fields[4], "price", line, &mut errors);
    let reseller_price_rp = parse_amount(fields[5], "reseller_price", line, &mut errors);
    let stock = parse_amount(fields[6], "stock", line, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewProduct {
        sku,
        name,
        category_id,
        cost_price_rp,
        price_rp,
        reseller_price_rp,
        stock,
        image_url: None,
    })
}

/// Parses a non-negative integer field; pushes an error and returns 0 on
/// failure (the row is rejected anyway once `errors` is non-empty).
fn parse_amount(raw: &str, field: &'static str, line: usize, errors: &mut Vec<RowError>) -> i64 {
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => n,
        Ok(n) => {
            errors.push(RowError {
                line,
                field,
                reason: format!("must not be negative, found {n}"),
            });
            0
        }
        Err(_) => {
            errors.push(RowError {
                line,
                field,
                reason: format!("not a number: '{raw}'"),
            });
            0
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
