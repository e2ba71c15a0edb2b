use crate::error::{IngestError, Result};
use crate::utils::constants::{MISSING_SENTINEL, MISSING_SENTINEL_VALUE};

/// Outcome of reading a single measurement cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Value(f64),
    Missing,
    Unparsable,
}

impl CellValue {
    pub fn value(self) -> Option<f64> {
        match self {
            CellValue::Value(v) => Some(v),
            CellValue::Missing | CellValue::Unparsable => None,
        }
    }
}

/// Parse a number written with a comma as decimal separator
///
/// # Examples
/// ```
/// use inmet_ingest::utils::parse_decimal;
///
/// assert_eq!(parse_decimal("-15,78944444"), Some(-15.78944444));
/// assert_eq!(parse_decimal(",2"), Some(0.2));
/// assert_eq!(parse_decimal("1.009,6"), None);
/// ```
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = trimmed.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Read a measurement cell, mapping empty cells and the `-9999` sentinel to missing
pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.is_empty() || trimmed == MISSING_SENTINEL {
        return CellValue::Missing;
    }

    match parse_decimal(trimmed) {
        Some(v) if v == MISSING_SENTINEL_VALUE => CellValue::Missing,
        Some(v) => CellValue::Value(v),
        None => CellValue::Unparsable,
    }
}

/// Parse a coordinate or altitude from the metadata header
pub fn parse_coordinate(raw: &str) -> Result<f64> {
    parse_decimal(raw).ok_or_else(|| {
        IngestError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0,2"), Some(0.2));
        assert_eq!(parse_decimal(" 1009,6 "), Some(1009.6));
        assert_eq!(parse_decimal("12"), Some(12.0));
        assert_eq!(parse_decimal("-,8"), Some(-0.8));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1,2,3"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn test_parse_cell_sentinels() {
        assert_eq!(parse_cell("-9999"), CellValue::Missing);
        assert_eq!(parse_cell("\"-9999\""), CellValue::Missing);
        assert_eq!(parse_cell("-9999,0"), CellValue::Missing);
        assert_eq!(parse_cell(""), CellValue::Missing);
        assert_eq!(parse_cell("   "), CellValue::Missing);
        assert_eq!(parse_cell("21,4"), CellValue::Value(21.4));
        assert_eq!(parse_cell("2,x"), CellValue::Unparsable);
        assert_eq!(parse_cell("2,x").value(), None);
    }

    #[test]
    fn test_parse_coordinate() {
        assert!((parse_coordinate("-15,78944444").unwrap() - -15.78944444).abs() < 1e-9);
        assert!((parse_coordinate("1160,96").unwrap() - 1160.96).abs() < 1e-9);
        assert!(matches!(
            parse_coordinate(""),
            Err(IngestError::InvalidCoordinate(_))
        ));
        assert!(parse_coordinate("sul").is_err());
    }
}
