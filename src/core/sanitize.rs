use serde::{Serialize, Serializer};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NumberKind {
    Decimal,
    Integer,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldRule {
    pub kind: NumberKind,
    pub min: f64,
    pub max: Option<f64>,
}

impl FieldRule {
    /// Non-negative decimal with no upper bound.
    pub const fn decimal() -> Self {
        Self {
            kind: NumberKind::Decimal,
            min: 0.0,
            max: None,
        }
    }

    /// Non-negative integer with no upper bound.
    pub const fn integer() -> Self {
        Self {
            kind: NumberKind::Integer,
            min: 0.0,
            max: None,
        }
    }

    pub const fn bounded(self, min: f64, max: f64) -> Self {
        Self {
            kind: self.kind,
            min,
            max: Some(max),
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        let floored = value.max(self.min);
        let clamped = match self.max {
            Some(max) => floored.min(max),
            None => floored,
        };
        // -0.0 would display as "-0".
        if clamped == 0.0 { 0.0 } else { clamped }
    }
}

/// A form field after sanitizing. `Unset` computes as zero but displays as
/// an empty field.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum SanitizedValue {
    #[default]
    Unset,
    Value(f64),
}

impl SanitizedValue {
    pub fn value(self) -> f64 {
        match self {
            SanitizedValue::Unset => 0.0,
            SanitizedValue::Value(v) => v,
        }
    }

    /// Falls back when the field is unset or zero.
    pub fn nonzero_or(self, fallback: f64) -> f64 {
        match self {
            SanitizedValue::Value(v) if v != 0.0 => v,
            _ => fallback,
        }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, SanitizedValue::Unset)
    }

    pub fn display(self) -> String {
        match self {
            SanitizedValue::Unset => String::new(),
            SanitizedValue::Value(v) => format!("{v}"),
        }
    }
}

impl Serialize for SanitizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

pub fn sanitize(raw: &str, rule: FieldRule) -> SanitizedValue {
    let parsed = match rule.kind {
        NumberKind::Decimal => decimal_prefix(raw),
        NumberKind::Integer => integer_prefix(raw),
    };
    match parsed {
        Some(v) => SanitizedValue::Value(rule.clamp(v)),
        None => SanitizedValue::Unset,
    }
}

/// Parses the longest leading decimal literal, ignoring trailing text.
fn decimal_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a leading signed run of digits; "5.7" reads as 5.
fn integer_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
