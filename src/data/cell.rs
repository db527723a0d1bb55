use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// A single typed table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl CellValue {
    /// Build a cell from a JSON value, inferring dates from strings
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else {
                    CellValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Self::infer_from_string(s),
            other => CellValue::String(other.to_string()),
        }
    }

    /// Infer a typed cell from a string value
    pub fn infer_from_string(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("null") {
            return CellValue::Null;
        }

        if value.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        if let Ok(i) = value.parse::<i64>() {
            return CellValue::Integer(i);
        }

        if let Ok(f) = value.parse::<f64>() {
            return CellValue::Float(f);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return CellValue::DateTime(dt.with_timezone(&Utc));
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return CellValue::DateTime(DateTime::from_naive_utc_and_offset(dt, Utc));
            }
        }

        CellValue::String(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text rendition used for display, filtering, and the alphanumeric
    /// comparator fallback
    pub fn render(&self) -> String {
        match self {
            CellValue::String(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Null => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Compare two cells for sorting.
///
/// Date pairs compare chronologically and numeric pairs numerically;
/// everything else falls back to a case-sensitive alphanumeric comparison of
/// the rendered text. Nulls sort first.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),

        (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
        (CellValue::Float(a), CellValue::Float(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (CellValue::Integer(i), CellValue::Float(f)) => {
            (*i as f64).partial_cmp(f).unwrap_or(Ordering::Equal)
        }
        (CellValue::Float(f), CellValue::Integer(i)) => {
            f.partial_cmp(&(*i as f64)).unwrap_or(Ordering::Equal)
        }

        (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),

        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Less,
        (_, CellValue::Null) => Ordering::Greater,

        _ => alphanumeric_compare(&a.render(), &b.render()),
    }
}

/// Case-sensitive alphanumeric comparison: digit runs compare as numbers,
/// text runs compare byte-wise, so "item2" sorts before "item10".
pub fn alphanumeric_compare(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let na = take_digit_run(&mut ca);
                    let nb = take_digit_run(&mut cb);
                    let cmp = compare_digit_runs(&na, &nb);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                } else {
                    let cmp = x.cmp(&y);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                    ca.next();
                    cb.next();
                }
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            run.push(c);
            chars.next();
        } else {
            break;
        }
    }
    run
}

/// Compare digit runs numerically without parsing, so arbitrarily long
/// runs cannot overflow
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_comparison() {
        assert_eq!(
            compare_cells(&CellValue::Integer(1), &CellValue::Integer(2)),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&CellValue::Integer(2), &CellValue::Integer(2)),
            Ordering::Equal
        );
        assert_eq!(
            compare_cells(&CellValue::Integer(3), &CellValue::Integer(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            compare_cells(&CellValue::Integer(1), &CellValue::Float(1.5)),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&CellValue::Float(2.5), &CellValue::Integer(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_datetime_comparison() {
        let a = CellValue::infer_from_string("2024-01-01");
        let b = CellValue::infer_from_string("2024-06-15");
        assert!(matches!(a, CellValue::DateTime(_)));
        assert_eq!(compare_cells(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            compare_cells(&CellValue::Null, &CellValue::Integer(1)),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(&CellValue::Integer(1), &CellValue::Null),
            Ordering::Greater
        );
        assert_eq!(
            compare_cells(&CellValue::Null, &CellValue::Null),
            Ordering::Equal
        );
    }

    #[test]
    fn test_alphanumeric_digit_runs() {
        assert_eq!(alphanumeric_compare("item2", "item10"), Ordering::Less);
        assert_eq!(alphanumeric_compare("item10", "item10"), Ordering::Equal);
        assert_eq!(alphanumeric_compare("a20b", "a20a"), Ordering::Greater);
        // case-sensitive: uppercase sorts before lowercase
        assert_eq!(alphanumeric_compare("Apple", "apple"), Ordering::Less);
        // leading zeros compare by value
        assert_eq!(alphanumeric_compare("a007", "a7"), Ordering::Equal);
    }

    #[test]
    fn test_infer_from_string() {
        assert_eq!(CellValue::infer_from_string(""), CellValue::Null);
        assert_eq!(CellValue::infer_from_string("true"), CellValue::Boolean(true));
        assert_eq!(CellValue::infer_from_string("42"), CellValue::Integer(42));
        assert_eq!(CellValue::infer_from_string("4.5"), CellValue::Float(4.5));
        assert_eq!(
            CellValue::infer_from_string("hello"),
            CellValue::String("hello".to_string())
        );
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            CellValue::from_json(&serde_json::json!(7)),
            CellValue::Integer(7)
        );
        assert_eq!(CellValue::from_json(&serde_json::json!(null)), CellValue::Null);
        assert_eq!(
            CellValue::from_json(&serde_json::json!("x")),
            CellValue::String("x".to_string())
        );
    }
}
