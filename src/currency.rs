//! Formats amounts of money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

static POUNDS: OnceLock<Formatter> = OnceLock::new();
static NEGATIVE_POUNDS: OnceLock<Formatter> = OnceLock::new();

fn pounds_formatter(cell: &'static OnceLock<Formatter>, prefix: &str) -> &'static Formatter {
    cell.get_or_init(|| {
        Formatter::currency(prefix)
            .expect("currency prefix is short enough")
            .precision(Precision::Decimals(2))
    })
}

/// Format `number` as pounds with two decimal places, e.g. "£1,234.50" or "-£45.99".
pub fn format_currency(number: f64) -> String {
    let formatted = if number < 0.0 {
        pounds_formatter(&NEGATIVE_POUNDS, "-£").fmt_string(number.abs())
    } else if number > 0.0 {
        pounds_formatter(&POUNDS, "£").fmt_string(number)
    } else {
        return "£0.00".to_owned();
    };

    // numfmt drops the last trailing zero, e.g. "12.30" comes out as "12.3".
    match formatted.rsplit_once('.') {
        Some((_, decimals)) if decimals.len() == 1 => format!("{formatted}0"),
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::format_currency;

    #[test]
    fn zero_has_two_decimals() {
        assert_eq!(format_currency(0.0), "£0.00");
    }

    #[test]
    fn negative_amounts_have_leading_sign() {
        assert!(format_currency(-45.99).starts_with("-£"));
    }

    #[test]
    fn negative_amounts_end_with_two_decimals() {
        let formatted = format_currency(-120.5);

        assert!(formatted.ends_with("120.50"), "got {formatted}");
    }

    #[test]
    fn positive_amounts_end_with_two_decimals() {
        let formatted = format_currency(12.3);

        assert!(formatted.starts_with('£'), "got {formatted}");
        assert!(formatted.ends_with("12.30"), "got {formatted}");
    }
}
