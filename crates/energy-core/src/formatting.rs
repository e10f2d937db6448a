/// Format a number with a fixed number of decimal places and a comma as the
/// decimal separator.
///
/// Rounding happens here and nowhere else; the separator is swapped only after
/// the number has been rendered.
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_decimal;
///
/// assert_eq!(format_decimal(1234.5, 2), "1234,50");
/// assert_eq!(format_decimal(0.0, 2), "0,00");
/// assert_eq!(format_decimal(-3.14159, 1), "-3,1");
/// assert_eq!(format_decimal(42.0, 0), "42");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    // A value that rounds to zero never keeps its minus sign.
    let rendered = format!("{:.prec$}", value, prec = decimals);
    let rendered = match rendered.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => rendered,
    };
    rendered.replacen('.', ",", 1)
}

/// Energy amount with two decimals and a `kWh` suffix.
///
/// ```
/// use energy_core::formatting::format_kwh;
///
/// assert_eq!(format_kwh(12.346), "12,35 kWh");
/// ```
pub fn format_kwh(value: f64) -> String {
    format!("{} kWh", format_decimal(value, 2))
}

/// Temperature with two decimals and a `°C` suffix.
///
/// ```
/// use energy_core::formatting::format_celsius;
///
/// assert_eq!(format_celsius(-1.5), "-1,50 °C");
/// ```
pub fn format_celsius(value: f64) -> String {
    format!("{} °C", format_decimal(value, 2))
}

/// Left-justify `text` in a column of `width` characters, cutting it when it
/// is longer.
pub fn fit_column(text: &str, width: usize) -> String {
    format!("{:<width$.width$}", text, width = width)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
