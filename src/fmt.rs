use rust_decimal::{Decimal, RoundingStrategy};

/// Group an unsigned digit string with dots: "1234567" -> "1.234.567".
fn group_thousands(int_part: &str) -> String {
    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    with_dots.chars().rev().collect()
}

fn localized(val: Decimal, decimals: u32) -> String {
    let rounded = val.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let fixed = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(d) = dec_part {
        out.push(',');
        out.push_str(d);
    }
    out
}

/// Brazilian real with two decimals: R$ 1.234,56
pub fn money(val: Decimal) -> String {
    format!("R$ {}", localized(val, 2))
}

/// Brazilian real without cents, used for chart labels: R$ 1.235
pub fn money_whole(val: Decimal) -> String {
    format!("R$ {}", localized(val, 0))
}

/// Localized number with two decimals and no currency symbol: 1.234,56
pub fn number(val: Decimal) -> String {
    localized(val, 2)
}

/// Percentage with two decimals and a decimal point: 12.34%
pub fn percent(val: Decimal) -> String {
    let mut rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{rounded:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(d("1234.5")), "R$ 1.234,50");
        assert_eq!(money(d("1234.56")), "R$ 1.234,56");
        assert_eq!(money(d("-500")), "R$ -500,00");
        assert_eq!(money(Decimal::ZERO), "R$ 0,00");
        assert_eq!(money(d("1000000.99")), "R$ 1.000.000,99");
        assert_eq!(money(d("42.1")), "R$ 42,10");
        assert_eq!(money(d("999.999")), "R$ 1.000,00");
    }

    #[test]
    fn test_money_never_prints_negative_zero() {
        assert_eq!(money(d("-0.001")), "R$ 0,00");
    }

    #[test]
    fn test_money_whole() {
        assert_eq!(money_whole(d("1234.5")), "R$ 1.235");
        assert_eq!(money_whole(d("-98765.4")), "R$ -98.765");
        assert_eq!(money_whole(Decimal::ZERO), "R$ 0");
    }

    #[test]
    fn test_number_and_percent() {
        assert_eq!(number(d("-1234567.891")), "-1.234.567,89");
        assert_eq!(percent(d("12.345")), "12.35%");
        assert_eq!(percent(Decimal::ZERO), "0.00%");
        assert_eq!(percent(d("-7.1")), "-7.10%");
    }
}
