// 🧮 Child Metrics - Derived values
// Age in months and BMI, recomputed from raw inputs; failures degrade to None

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Calendar-month difference between birth and measurement.
///
/// (Δyear * 12 + Δmonth), minus one when the measurement day-of-month is
/// before the birth day-of-month. Negative for dates before birth.
pub fn age_months(birthdate: NaiveDate, date: Option<NaiveDate>) -> Option<i32> {
    let date = date?;
    let mut months = (date.year() - birthdate.year()) * 12 + (date.month() as i32 - birthdate.month() as i32);
    if date.day() < birthdate.day() {
        months -= 1;
    }
    Some(months)
}

/// BMI rounded to 2 decimals; None unless both inputs are positive numbers
pub fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = weight_kg?;
    let height = height_cm?;

    if !(weight > 0.0 && height > 0.0) {
        return None;
    }

    let meters = height / 100.0;
    let value = weight / (meters * meters);
    if value.is_finite() {
        Some((value * 100.0).round() / 100.0)
    } else {
        None
    }
}

/// Parse a measurement date. Accepts ISO dates, slash-separated ISO dates
/// and ISO timestamps (time part ignored).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// Parse a numeric measurement cell; blanks and garbage are None
pub fn parse_measurement(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
