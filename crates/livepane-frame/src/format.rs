//! Locale-aware formatting of dates, prices and availability.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use livepane_core::Locale;
use serde_json::Value;

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|datetime| datetime.date())
}

/// Long date, `1. April 2026` in German and `April 1, 2026` in English.
///
/// Values that do not parse as a date are returned unchanged.
pub fn format_date(value: &str, locale: Locale) -> String {
    if value.trim().is_empty() {
        return String::new();
    }

    let Some(date) = parse_date(value) else {
        return value.to_string();
    };

    match locale {
        Locale::De => format!(
            "{}. {} {}",
            date.day(),
            GERMAN_MONTHS[date.month0() as usize],
            date.year()
        ),
        Locale::En => date.format("%B %-d, %Y").to_string(),
    }
}

/// Print a scalar JSON value the way a template would.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Whether a value counts as set: non-empty strings, non-zero numbers, `true`
/// and any list or object.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Numeric value of a field; missing or unparseable values count as zero.
pub fn amount(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Euro amount, `620 €` or `€620`.
pub fn price(value: f64, locale: Locale) -> String {
    match locale {
        Locale::De => format!("{} €", format_amount(value)),
        Locale::En => format!("€{}", format_amount(value)),
    }
}

/// Monthly total, `770 € / Monat` or `€770 / month`.
pub fn monthly_total(value: f64, locale: Locale) -> String {
    match locale {
        Locale::De => format!("{} € / Monat", format_amount(value)),
        Locale::En => format!("€{} / month", format_amount(value)),
    }
}

/// Availability label of an apartment.
pub fn availability(available: bool, available_from: Option<&str>, locale: Locale) -> String {
    if !available {
        return match locale {
            Locale::De => "Vermietet".to_string(),
            Locale::En => "Occupied".to_string(),
        };
    }

    match available_from.filter(|from| !from.is_empty()) {
        Some(from) => {
            let date = format_date(from, locale);
            match locale {
                Locale::De => format!("Verfuegbar ab {date}"),
                Locale::En => format!("Available from {date}"),
            }
        }
        None => match locale {
            Locale::De => "Verfuegbar".to_string(),
            Locale::En => "Available".to_string(),
        },
    }
}
