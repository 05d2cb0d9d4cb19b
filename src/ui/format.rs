//! Number formatting for cards and the detail view

const MISSING: &str = "N/A";

/// Symbol for a quote currency code, falling back to the upper-cased code
pub fn currency_symbol(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "inr" => "₹".to_string(),
        "usd" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "jpy" | "cny" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    }
}

/// Inserts digit-group commas into an integer string
///
/// Rupee amounts use Indian grouping (`50,00,000`): the last three digits,
/// then pairs. Everything else groups in threes.
fn group_digits(digits: &str, currency: &str) -> String {
    let len = digits.len();
    let indian = currency.eq_ignore_ascii_case("inr");
    let mut out = String::with_capacity(len + len / 2);
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        let boundary = if indian {
            remaining == 3 || (remaining > 3 && remaining % 2 == 1)
        } else {
            remaining % 3 == 0
        };
        if i > 0 && boundary {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_fixed(value: f64, decimals: usize, currency: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = format!("{}{}{}", sign, currency_symbol(currency), group_digits(int_part, currency));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Price with four fraction digits below 1, two otherwise
pub fn format_price(price: Option<f64>, currency: &str) -> String {
    match price {
        Some(p) if p.abs() < 1.0 => format_fixed(p, 4, currency),
        Some(p) => format_fixed(p, 2, currency),
        None => MISSING.to_string(),
    }
}

/// Whole-unit amount, used for market cap and volume in the detail view
pub fn format_amount(value: Option<f64>, currency: &str) -> String {
    value
        .map(|v| format_fixed(v, 0, currency))
        .unwrap_or_else(|| MISSING.to_string())
}

/// Compact amount with a T/B/M/K suffix
pub fn format_compact(value: Option<f64>, currency: &str) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    let symbol = currency_symbol(currency);
    let (scaled, suffix) = if v >= 1e12 {
        (v / 1e12, "T")
    } else if v >= 1e9 {
        (v / 1e9, "B")
    } else if v >= 1e6 {
        (v / 1e6, "M")
    } else {
        (v / 1e3, "K")
    };
    format!("{}{:.2}{}", symbol, scaled, suffix)
}

/// Signed percent change
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c > 0.0 => format!("+{:.2}%", c),
        Some(c) => format!("{:.2}%", c),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(5_123_456.789), "inr"), "₹51,23,456.79");
        assert_eq!(format_price(Some(5_000_000.0), "inr"), "₹50,00,000.00");
        assert_eq!(format_price(Some(-1_234.5), "INR"), "-₹1,234.50");
        assert_eq!(format_price(Some(0.123456), "usd"), "$0.1235");
        assert_eq!(format_price(Some(100.0), "eur"), "€100.00");
        assert_eq!(format_price(Some(12.5), "chf"), "CHF 12.50");
        assert_eq!(format_price(None, "inr"), "N/A");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some(1_234_567.4), "usd"), "$1,234,567");
        assert_eq!(format_amount(Some(999.0), "usd"), "$999");
        assert_eq!(format_amount(Some(5_000_000.0), "inr"), "₹50,00,000");
        assert_eq!(format_amount(Some(123_456_789_012.0), "inr"), "₹1,23,45,67,89,012");
        assert_eq!(format_amount(Some(99_999.0), "inr"), "₹99,999");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(Some(2.5e12), "inr"), "₹2.50T");
        assert_eq!(format_compact(Some(3.1e9), "inr"), "₹3.10B");
        assert_eq!(format_compact(Some(4.2e6), "inr"), "₹4.20M");
        assert_eq!(format_compact(Some(1_500.0), "inr"), "₹1.50K");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(3.14159)), "+3.14%");
        assert_eq!(format_change(Some(-0.5)), "-0.50%");
        assert_eq!(format_change(Some(0.0)), "0.00%");
    }
}
