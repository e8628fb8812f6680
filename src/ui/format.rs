//! Formatting helpers shared by the board and chart renderers.

use chrono::{Local, TimeZone};

use crate::market_data::Period;

/// Strip useless trailing zeros (and a dangling decimal point) from a
/// numeric string. Applied only at render time so the raw API payload is
/// preserved everywhere else.
pub fn trim_trailing_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a price with a precision that keeps small values legible
pub fn format_number(value: f64) -> String {
    if value.abs() >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.8}", value)
    }
}

/// Render a price from the raw exchange text when available, falling back
/// to the numeric value
pub fn format_price(raw: Option<&String>, value: f64) -> String {
    match raw {
        Some(text) if !text.is_empty() => trim_trailing_zeros(text),
        _ => trim_trailing_zeros(&format_number(value)),
    }
}

/// Y-axis labels widen their precision as the visible range tightens
pub fn format_axis_price(value: f64, range: f64) -> String {
    let mut decimals = 2;
    if range < 0.5 {
        decimals = 4;
    }
    if range < 0.05 {
        decimals = 6;
    }
    if range < 0.005 {
        decimals = 8;
    }
    if range < 0.0005 {
        decimals = 10;
    }
    trim_trailing_zeros(&format!("{:.*}", decimals, value))
}

// Apply thousands separators to a formatted numeric string.
fn insert_commas(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = digits - i - 1;
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a volume-sized float with thousands separators
pub fn format_grouped(value: f64) -> String {
    insert_commas(&format_number(value))
}

/// Format an integer count with thousands separators
pub fn format_count(value: u64) -> String {
    insert_commas(&value.to_string())
}

/// Wall-clock string for the title bar
pub fn format_clock() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format an epoch-millisecond timestamp in local time
pub fn format_time_ms(timestamp_ms: u64, fmt: &str) -> String {
    match Local.timestamp_millis_opt(timestamp_ms as i64).single() {
        Some(datetime) => datetime.format(fmt).to_string(),
        None => "-".to_string(),
    }
}

/// Pick an X-axis label format for the candle interval and the space
/// available per label
pub fn axis_label_format(period: Period, label_width: u16) -> &'static str {
    match period {
        Period::OneMinute | Period::FifteenMinutes | Period::OneHour => {
            if label_width >= 8 {
                "%H:%M"
            } else {
                "%H"
            }
        }
        Period::FourHours => {
            if label_width >= 10 {
                "%m-%d %H:%M"
            } else {
                "%m-%d"
            }
        }
        Period::OneDay => "%m-%d",
        Period::OneWeek | Period::OneMonth => "%y-%m",
    }
}
