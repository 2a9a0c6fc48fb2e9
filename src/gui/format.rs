//! Display formatting for the dashboard: labels and currency.

const SEASON_NAMES: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// "3 (Fall)" for season codes 1-4, the bare number otherwise.
pub fn season_label(season: i64) -> String {
    match usize::try_from(season - 1).ok().and_then(|i| SEASON_NAMES.get(i)) {
        Some(name) => format!("{} ({})", season, name),
        None => season.to_string(),
    }
}

/// "8 (Aug)" for month numbers 1-12, the bare number otherwise.
pub fn month_label(month: i64) -> String {
    match usize::try_from(month - 1).ok().and_then(|i| MONTH_NAMES.get(i)) {
        Some(name) => format!("{} ({})", month, name),
        None => month.to_string(),
    }
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "AUD" => "AU$",
        "USD" => "US$",
        "EUR" => "€",
        "COP" => "$",
        other => other,
    }
}

/// Group digits in threes with `sep`.
fn group_thousands(value: u64, sep: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Currency amount in Colombian Spanish conventions: symbol, non-breaking
/// space, `.` between thousands and `,` before two decimals.
pub fn format_currency(amount: f64, code: &str) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{}\u{a0}{},{:02}",
        sign,
        currency_symbol(code),
        group_thousands(cents / 100, '.'),
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.891, "AUD"), "AU$\u{a0}1.234.567,89");
        assert_eq!(format_currency(0.5, "AUD"), "AU$\u{a0}0,50");
        assert_eq!(format_currency(-999.999, "USD"), "-US$\u{a0}1.000,00");
        assert_eq!(format_currency(12.0, "XYZ"), "XYZ\u{a0}12,00");
        assert_eq!(format_currency(f64::NAN, "AUD"), "-");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(999, '.'), "999");
        assert_eq!(group_thousands(1000, '.'), "1.000");
        assert_eq!(group_thousands(12345678, '.'), "12.345.678");
    }

    #[test]
    fn test_labels() {
        assert_eq!(season_label(3), "3 (Fall)");
        assert_eq!(season_label(7), "7");
        assert_eq!(month_label(8), "8 (Aug)");
        assert_eq!(month_label(0), "0");
    }
}
