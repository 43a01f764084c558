use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::table::CellValue;
use crate::domain::value_objects::{ColumnType, Side};
use crate::domain::verdict::CellVerdict;

// ─── Canonical values ───

/// A present value interpreted as its column's declared type.
#[derive(Debug, Clone, PartialEq)]
enum Canonical<'a> {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(&'a str),
}

/// Outcome of reading one stored value as a column type.
enum Coerced<'a> {
    Absent,
    Present(Canonical<'a>),
    Failed,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn coerce(value: Option<&CellValue>, ty: ColumnType) -> Coerced<'_> {
    let Some(value) = value else {
        return Coerced::Absent;
    };

    match ty {
        ColumnType::Numeric => match value {
            CellValue::Int(i) => Coerced::Present(Canonical::Int(*i)),
            CellValue::Float(f) if f.is_nan() => Coerced::Absent,
            CellValue::Float(f) => Coerced::Present(Canonical::Float(*f)),
            CellValue::Text(s) => parse_number(s),
            CellValue::Date(_) => Coerced::Failed,
        },
        ColumnType::Date => match value {
            CellValue::Date(d) => Coerced::Present(Canonical::Date(*d)),
            CellValue::Text(s) => match parse_date(s) {
                Some(d) => Coerced::Present(Canonical::Date(d)),
                None => Coerced::Failed,
            },
            CellValue::Int(_) | CellValue::Float(_) => Coerced::Failed,
        },
        ColumnType::Text | ColumnType::Categorical => match value {
            CellValue::Text(s) => Coerced::Present(Canonical::Text(s)),
            _ => Coerced::Failed,
        },
    }
}

fn parse_number(s: &str) -> Coerced<'_> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Coerced::Present(Canonical::Int(i));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_nan() => Coerced::Absent,
        Ok(f) => Coerced::Present(Canonical::Float(f)),
        Err(_) => Coerced::Failed,
    }
}

/// Parse a calendar date, accepting a trailing time of day which is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

fn canonical_eq(a: &Canonical<'_>, b: &Canonical<'_>) -> bool {
    match (a, b) {
        (Canonical::Int(x), Canonical::Int(y)) => x == y,
        (Canonical::Int(x), Canonical::Float(y)) | (Canonical::Float(y), Canonical::Int(x)) => {
            int_eq_float(*x, *y)
        }
        (Canonical::Float(x), Canonical::Float(y)) => x == y,
        (Canonical::Date(x), Canonical::Date(y)) => x == y,
        (Canonical::Text(x), Canonical::Text(y)) => x == y,
        _ => false,
    }
}

/// Exact: the float must hold an integral value inside the i64 range.
fn int_eq_float(i: i64, f: f64) -> bool {
    // 2^63 itself is out of range, hence the strict upper bound
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    f.is_finite() && f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) && f as i64 == i
}

/// Whether `value` counts as absent for a column of type `ty`.
pub(crate) fn is_absent(value: Option<&CellValue>, ty: ColumnType) -> bool {
    matches!(coerce(value, ty), Coerced::Absent)
}

// ─── Cell comparator ───

/// Compare one left and one right value of a column of type `ty`.
///
/// A value that cannot be read as `ty` yields `Invalid`, which takes
/// precedence over the presence rules. Otherwise two absent values are
/// `Equal`, a single absent value is `MissingLeft`/`MissingRight`, and two
/// present values are compared exactly, without tolerance.
pub fn compare(left: Option<&CellValue>, right: Option<&CellValue>, ty: ColumnType) -> CellVerdict {
    let l = coerce(left, ty);
    let r = coerce(right, ty);

    match (l, r) {
        (Coerced::Failed, Coerced::Failed) => CellVerdict::Invalid(Side::Both),
        (Coerced::Failed, _) => CellVerdict::Invalid(Side::Left),
        (_, Coerced::Failed) => CellVerdict::Invalid(Side::Right),
        (Coerced::Absent, Coerced::Absent) => CellVerdict::Equal,
        (Coerced::Absent, Coerced::Present(_)) => CellVerdict::MissingLeft,
        (Coerced::Present(_), Coerced::Absent) => CellVerdict::MissingRight,
        (Coerced::Present(a), Coerced::Present(b)) => {
            if canonical_eq(&a, &b) {
                CellVerdict::Equal
            } else {
                CellVerdict::Mismatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    // ── presence ──

    #[test]
    fn both_absent_is_equal() {
        assert_eq!(compare(None, None, ColumnType::Numeric), CellVerdict::Equal);
        assert_eq!(compare(None, None, ColumnType::Text), CellVerdict::Equal);
    }

    #[test]
    fn absent_left_is_missing_left() {
        let v = CellValue::Float(4.5);
        assert_eq!(
            compare(None, Some(&v), ColumnType::Numeric),
            CellVerdict::MissingLeft
        );
    }

    #[test]
    fn absent_right_is_missing_right() {
        let v = CellValue::Float(4.5);
        assert_eq!(
            compare(Some(&v), None, ColumnType::Numeric),
            CellVerdict::MissingRight
        );
    }

    #[test]
    fn nan_counts_as_absent() {
        let nan = CellValue::Float(f64::NAN);
        let v = CellValue::Float(1.0);
        assert_eq!(
            compare(Some(&nan), Some(&nan), ColumnType::Numeric),
            CellVerdict::Equal
        );
        assert_eq!(
            compare(Some(&nan), Some(&v), ColumnType::Numeric),
            CellVerdict::MissingLeft
        );
        assert_eq!(
            compare(Some(&v), Some(&text("NaN")), ColumnType::Numeric),
            CellVerdict::MissingRight
        );
    }

    // ── numeric ──

    #[test]
    fn numeric_has_no_tolerance() {
        let a = CellValue::Float(0.1 + 0.2);
        let b = CellValue::Float(0.3);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
    }

    #[test]
    fn numeric_int_and_float_canonicalise() {
        let a = CellValue::Int(100);
        let b = CellValue::Float(100.0);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Numeric),
            CellVerdict::Equal
        );
    }

    #[test]
    fn numeric_int_and_float_compare_exactly_beyond_f64_precision() {
        let a = CellValue::Int(9_007_199_254_740_993);
        let b = CellValue::Float(9_007_199_254_740_992.0);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
        assert_eq!(
            compare(Some(&b), Some(&a), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
        let c = CellValue::Int(9_007_199_254_740_992);
        assert_eq!(
            compare(Some(&c), Some(&b), ColumnType::Numeric),
            CellVerdict::Equal
        );
    }

    #[test]
    fn numeric_int_never_equals_fraction_or_out_of_range_float() {
        let i = CellValue::Int(i64::MAX);
        assert_eq!(
            compare(Some(&i), Some(&CellValue::Float(9.3e18)), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
        assert_eq!(
            compare(Some(&CellValue::Int(2)), Some(&CellValue::Float(2.5)), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
        assert_eq!(
            compare(
                Some(&CellValue::Int(0)),
                Some(&CellValue::Float(f64::INFINITY)),
                ColumnType::Numeric
            ),
            CellVerdict::Mismatch
        );
    }

    #[test]
    fn numeric_text_is_parsed() {
        let a = text(" 101.25 ");
        let b = CellValue::Float(101.25);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Numeric),
            CellVerdict::Equal
        );
        let c = text("3000");
        assert_eq!(
            compare(Some(&c), Some(&CellValue::Int(3001)), ColumnType::Numeric),
            CellVerdict::Mismatch
        );
    }

    #[test]
    fn numeric_garbage_is_invalid() {
        let a = text("n/a?");
        let b = CellValue::Float(1.0);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Numeric),
            CellVerdict::Invalid(Side::Left)
        );
        assert_eq!(
            compare(Some(&b), Some(&date(2020, 1, 1)), ColumnType::Numeric),
            CellVerdict::Invalid(Side::Right)
        );
    }

    #[test]
    fn absence_follows_column_type() {
        assert!(is_absent(None, ColumnType::Text));
        assert!(is_absent(Some(&CellValue::Float(f64::NAN)), ColumnType::Numeric));
        assert!(is_absent(Some(&text("NaN")), ColumnType::Numeric));
        assert!(!is_absent(Some(&text("NaN")), ColumnType::Text));
        assert!(!is_absent(Some(&text("#REF!")), ColumnType::Numeric));
    }

    #[test]
    fn invalid_wins_over_missing() {
        let a = text("abc");
        assert_eq!(
            compare(Some(&a), None, ColumnType::Numeric),
            CellVerdict::Invalid(Side::Left)
        );
        assert_eq!(
            compare(Some(&a), Some(&a), ColumnType::Numeric),
            CellVerdict::Invalid(Side::Both)
        );
    }

    // ── dates ──

    #[test]
    fn date_compares_by_calendar_day() {
        let a = date(2031, 6, 15);
        let b = text("2031-06-15");
        let c = text("2031-06-15 13:45:00");
        let t = text("2031-06-15T23:59:59");
        assert_eq!(compare(Some(&a), Some(&b), ColumnType::Date), CellVerdict::Equal);
        assert_eq!(compare(Some(&a), Some(&c), ColumnType::Date), CellVerdict::Equal);
        assert_eq!(compare(Some(&t), Some(&a), ColumnType::Date), CellVerdict::Equal);
        let d = date(2031, 6, 16);
        assert_eq!(
            compare(Some(&a), Some(&d), ColumnType::Date),
            CellVerdict::Mismatch
        );
    }

    #[test]
    fn parse_date_accepts_t_separated_datetime() {
        assert_eq!(
            parse_date("2004-03-17T08:30:00"),
            NaiveDate::from_ymd_opt(2004, 3, 17)
        );
        assert_eq!(parse_date("2004-03-17T08:30"), None);
    }

    #[test]
    fn date_rejects_unparseable_text() {
        let a = date(2031, 6, 15);
        let b = text("15/06/2031");
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Date),
            CellVerdict::Invalid(Side::Right)
        );
    }

    // ── text ──

    #[test]
    fn text_is_case_sensitive() {
        let a = text("AAA");
        let b = text("aaa");
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Categorical),
            CellVerdict::Mismatch
        );
        assert_eq!(
            compare(Some(&a), Some(&a.clone()), ColumnType::Text),
            CellVerdict::Equal
        );
    }

    #[test]
    fn text_column_rejects_numbers() {
        let a = text("Issuer 7");
        let b = CellValue::Int(7);
        assert_eq!(
            compare(Some(&a), Some(&b), ColumnType::Text),
            CellVerdict::Invalid(Side::Right)
        );
    }
}
