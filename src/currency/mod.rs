use serde::{Deserialize, Serialize};

/// Locale conventions used to print prices.
///
/// The default mirrors `Intl.NumberFormat("id-ID", { currency: "IDR" })`:
/// `Rp 1.234.567,00`, with a non-breaking space after the symbol.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub fraction_digits: u8,
    pub space_after_symbol: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::rupiah()
    }
}

impl CurrencyFormat {
    pub fn rupiah() -> Self {
        Self {
            symbol: "Rp".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            fraction_digits: 2,
            space_after_symbol: true,
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let digits = u32::from(self.fraction_digits.min(6));
        let scale = 10u128.pow(digits);
        let minor = (amount.abs() * scale as f64).round() as u128;
        let whole = minor / scale;
        let fraction = minor % scale;

        let mut out = String::new();
        if minor != 0 && amount.is_sign_negative() {
            out.push('-');
        }
        out.push_str(&self.symbol);
        if self.space_after_symbol {
            out.push('\u{a0}');
        }
        out.push_str(&group_thousands(whole, self.thousands_separator));
        if digits > 0 {
            out.push(self.decimal_separator);
            out.push_str(&format!("{:0width$}", fraction, width = digits as usize));
        }
        out
    }
}

fn group_thousands(value: u128, separator: char) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
