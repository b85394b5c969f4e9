/// Scientific notation for legends and labels: `20000.0` -> `2.00×10^4`.
///
/// Zero, negative and non-finite values are printed plainly.
pub fn format_sci(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return format!("{}", value);
    }
    let mut exponent = value.log10().floor() as i32;
    let mut mantissa = value / 10f64.powi(exponent);
    // 9.999 rounds to 10.00 at two decimals.
    if (mantissa * 100.0).round() >= 1000.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    format!("{:.2}×10^{}", mantissa, exponent)
}

pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.abs() >= 1e5 {
        let sci = format_sci(value.abs());
        if value < 0.0 {
            format!("-{}", sci)
        } else {
            sci
        }
    } else {
        format!("{:.2}", value)
    }
}
