//! Numeric prefix parsing with the semantics of C `strtoll` / `atof`.
//!
//! Bere se nejdelší platný číselný prefix, zbytek se ignoruje. Když žádný
//! prefix není, výsledek je 0 a žádná chyba se nehlásí.

use once_cell::sync::Lazy;
use regex::Regex;

// C isspace(): mezera, \t, \n, \v, \f, \r (ne Unicode whitespace)
static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t\n\x0B\x0C\r]*([+-]?)([0-9]+)").unwrap());

// hex float jako strtod: "0x" bez číslic nebere, pak se čte jen "0"
static HEX_FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[ \t\n\x0B\x0C\r]*([+-]?)0[xX](?:([0-9a-fA-F]+)(?:\.([0-9a-fA-F]*))?|\.([0-9a-fA-F]+))(?:[pP]([+-]?[0-9]+))?",
    )
    .unwrap()
});

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[ \t\n\x0B\x0C\r]*([+-]?(?:(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|(?i:infinity|inf|nan)))",
    )
    .unwrap()
});

/// Parse a base-10 integer prefix like `strtoll(s, &end, 10)`.
///
/// Out-of-range values saturate to `i64::MAX` / `i64::MIN`.
pub fn parse_i64_prefix(s: &str) -> i64 {
    let Some(caps) = INT_PREFIX.captures(s) else {
        return 0;
    };

    let negative = &caps[1] == "-";
    let digits = &caps[2];

    // parse::<i64> zvládne znaménko, overflow řešíme ručně (ERANGE clamp)
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };

    match signed.parse::<i64>() {
        Ok(v) => v,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Parse a floating-point prefix like `atof(s)`, including C99 hex floats.
pub fn parse_f64_prefix(s: &str) -> f64 {
    if let Some(v) = parse_hex_float(s) {
        return v;
    }

    FLOAT_PREFIX
        .captures(s)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_hex_float(s: &str) -> Option<f64> {
    let caps = HEX_FLOAT_PREFIX.captures(s)?;

    let int_digits = caps.get(2).map_or("", |m| m.as_str());
    let frac_digits = caps
        .get(3)
        .or_else(|| caps.get(4))
        .map_or("", |m| m.as_str());

    let mut mantissa = 0.0f64;
    for c in int_digits.chars().chain(frac_digits.chars()) {
        mantissa = mantissa * 16.0 + f64::from(c.to_digit(16)?);
    }

    // binární exponent; obří hodnoty stejně skončí na inf / 0
    let exp = caps.get(5).map_or(0, |m| {
        m.as_str()
            .parse::<i64>()
            .unwrap_or(if m.as_str().starts_with('-') { i64::MIN } else { i64::MAX })
    });
    let exp = exp
        .saturating_sub(4 * frac_digits.len() as i64)
        .clamp(-10_000, 10_000) as i32;

    let value = scale_by_pow2(mantissa, exp);
    Some(if &caps[1] == "-" { -value } else { value })
}

// ldexp po krocích, aby 2^exp samo nepřeteklo dřív než součin
fn scale_by_pow2(mut value: f64, mut exp: i32) -> f64 {
    while exp > 1000 {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value * 2f64.powi(exp)
}
