#![forbid(unsafe_code)]

//! Chilean peso formatting (`es-CL`, no fraction digits).

/// Format `amount` as CLP: `$` prefix, `.` thousands separator, rounded half
/// away from zero. Non-finite amounts format as `$0`.
#[must_use]
pub fn format_clp(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = rounded < 0.0;
    // f64 -> u64 saturates; amounts beyond that are not prices.
    let digits = (rounded.abs() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        grouped.push('-');
    }
    grouped.push('$');
    let lead = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (idx + 3 - lead) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
