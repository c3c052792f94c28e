use num_format::{Locale, ToFormattedString};

/// ₹ with Indian digit grouping: `-₹12,34,567.50`. Whole-rupee amounts skip
/// the paise part.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let mut rupees = abs.trunc() as i64;
    let mut paise = (abs.fract() * 100.0).round() as i64;
    if paise == 100 {
        rupees += 1;
        paise = 0;
    }

    let grouped = rupees.to_formatted_string(&Locale::en_IN);
    if paise > 0 {
        format!("{sign}₹{grouped}.{paise:02}")
    } else {
        format!("{sign}₹{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_inr(1234567.0), "₹12,34,567");
        assert_eq!(format_inr(750.0), "₹750");
    }

    #[test]
    fn test_negative_and_paise() {
        assert_eq!(format_inr(-500.0), "-₹500");
        assert_eq!(format_inr(10.5), "₹10.50");
    }

    #[test]
    fn test_paise_rounding_carries() {
        assert_eq!(format_inr(0.999), "₹1");
    }
}
