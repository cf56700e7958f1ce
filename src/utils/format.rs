//! Number formatting for the dashboard panels and chart labels.
//!
//! Prices in INR follow the `en-IN` convention (lakh/crore grouping), large
//! magnitudes are shortened with a T/B/M/K suffix and USD figures use plain
//! thousands separators.

pub const RUPEE: &str = "₹";

/// Format a price in rupees.
///
/// Amounts of at least 1 are grouped the Indian way with 3 to 4 fractional
/// digits. Smaller amounts keep 8 fixed decimals so sub-paisa coins stay legible.
pub fn format_price_inr(price: f64) -> String {
    if price >= 1.0 {
        let formatted = format!("{:.4}", price);
        let (integer, fraction) = split_fraction(&formatted);
        let mut fraction = fraction.to_string();
        while fraction.len() > 3 && fraction.ends_with('0') {
            fraction.pop();
        }
        format!("{}{}.{}", RUPEE, group_indian(integer), fraction)
    } else {
        format!("{}{:.8}", RUPEE, price)
    }
}

/// Shorten a magnitude with a T/B/M/K suffix, 2 decimals.
pub fn format_number(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.2} T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2} B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2} M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2} K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

/// Sign-prefixed percentage with 2 decimals, e.g. `+1.25%`.
pub fn format_change_percent(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

/// CSS-like state class for a 24h change.
pub fn change_class(change: f64) -> &'static str {
    if change >= 0.0 {
        "positive"
    } else {
        "negative"
    }
}

/// USD amount with thousands separators and up to 3 fractional digits.
pub fn format_usd(amount: f64) -> String {
    format!("${}", format_grouped(amount, 3))
}

/// Thousands-separated number, trailing fractional zeros trimmed.
pub fn format_grouped(amount: f64, max_decimals: usize) -> String {
    let formatted = format!("{:.1$}", amount.abs(), max_decimals);
    let (integer, fraction) = split_fraction(&formatted);
    let fraction = fraction.trim_end_matches('0');
    let sign = if amount < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{}{}", sign, group_thousands(integer))
    } else {
        format!("{}{}.{}", sign, group_thousands(integer), fraction)
    }
}

fn split_fraction(formatted: &str) -> (&str, &str) {
    match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (formatted, ""),
    }
}

fn group_thousands(integer: &str) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Indian grouping: the last three digits, then pairs (`1,23,45,678`).
fn group_indian(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let head: Vec<char> = head.chars().collect();
    let mut out = String::new();
    for (i, c) in head.iter().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    format!("{}{},{}", sign, out, tail)
}
