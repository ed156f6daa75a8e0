//! Operand parsing module
//!
//! Query values arrive as strings. Each operand goes through an explicit
//! parse step that yields a number or `None`; nothing downstream coerces
//! strings on its own. A missing key, an empty value and a malformed value
//! are all simply invalid.

/// Parse an operand as a number
///
/// Accepts decimal notation with optional sign, fraction and exponent
/// (`12`, `-3.5`, `.5`, `1e3`) and the `Infinity` spellings. Surrounding
/// whitespace is ignored.
///
/// # Examples
/// ```
/// use maths_server::maths::params::parse_number;
/// assert_eq!(parse_number(Some(" 1e3 ")), Some(1000.0));
/// assert_eq!(parse_number(Some("abc")), None);
/// assert_eq!(parse_number(None), None);
/// ```
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // Rust's float parser also takes "inf" and "NaN", which are not numbers here
    if !is_decimal_literal(text) {
        return None;
    }

    text.parse::<f64>().ok()
}

/// Parse an operand as an integer-valued number
pub fn parse_integer(raw: Option<&str>) -> Option<f64> {
    parse_number(raw).filter(|value| value.is_finite() && value.fract() == 0.0)
}

fn is_decimal_literal(text: &str) -> bool {
    let is_sign = |c: char| c == '+' || c == '-';
    let unsigned = text.strip_prefix(is_sign).unwrap_or(text);

    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    exponent.map_or(true, |exp| {
        let digits = exp.strip_prefix(is_sign).unwrap_or(exp);
        !digits.is_empty() && all_digits(digits)
    })
}
