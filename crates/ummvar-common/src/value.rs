//! Typed attribute values.

use std::fmt;

/// Value of a netCDF attribute.
///
/// Numeric attributes are always stored as arrays; a scalar attribute is an
/// array of length one.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Byte(Vec<i8>),
    UByte(Vec<u8>),
    Short(Vec<i16>),
    UShort(Vec<u16>),
    Int(Vec<i32>),
    UInt(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// `char` attribute (classic netCDF text).
    Text(String),
    /// netCDF-4 `string` attribute, possibly multi-valued.
    Strings(Vec<String>),
}

/// A single numeric element of an attribute, widened without loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    /// Widen an `f32` through its shortest decimal representation, so that
    /// `0.01f32` becomes `0.01` rather than `0.009999999776482582`.
    pub fn from_f32(value: f32) -> Self {
        if !value.is_finite() {
            return Number::Float(value as f64);
        }
        let widened = value.to_string().parse::<f64>().unwrap_or(value as f64);
        Number::Float(widened)
    }

    /// Value as `f64`. Large 64-bit integers may round.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Whether the number is an integer or an integral float.
    pub fn is_integral(&self) -> bool {
        match *self {
            Number::Signed(_) | Number::Unsigned(_) => true,
            Number::Float(v) => v.is_finite() && v.fract() == 0.0,
        }
    }

    /// JSON form preserving the integer/float distinction. Non-finite floats
    /// have no JSON form.
    pub fn to_json(&self) -> Option<serde_json::Number> {
        match *self {
            Number::Signed(v) => Some(v.into()),
            Number::Unsigned(v) => Some(v.into()),
            Number::Float(v) => serde_json::Number::from_f64(v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Signed(v) => write!(f, "{}", v),
            Number::Unsigned(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", format_float(v)),
        }
    }
}

/// Render a float the way scientists expect to read it back: integral values
/// keep a trailing `.0`, non-finite values use the CDL spelling.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

impl AttrValue {
    /// Number of elements (characters count as one text element).
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Byte(v) => v.len(),
            AttrValue::UByte(v) => v.len(),
            AttrValue::Short(v) => v.len(),
            AttrValue::UShort(v) => v.len(),
            AttrValue::Int(v) => v.len(),
            AttrValue::UInt(v) => v.len(),
            AttrValue::Int64(v) => v.len(),
            AttrValue::UInt64(v) => v.len(),
            AttrValue::Float(v) => v.len(),
            AttrValue::Double(v) => v.len(),
            AttrValue::Text(_) => 1,
            AttrValue::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, AttrValue::Text(_) | AttrValue::Strings(_))
    }

    /// All elements as [`Number`]s, or `None` for textual attributes.
    pub fn numbers(&self) -> Option<Vec<Number>> {
        let numbers = match self {
            AttrValue::Byte(v) => v.iter().map(|&x| Number::Signed(x as i64)).collect(),
            AttrValue::UByte(v) => v.iter().map(|&x| Number::Unsigned(x as u64)).collect(),
            AttrValue::Short(v) => v.iter().map(|&x| Number::Signed(x as i64)).collect(),
            AttrValue::UShort(v) => v.iter().map(|&x| Number::Unsigned(x as u64)).collect(),
            AttrValue::Int(v) => v.iter().map(|&x| Number::Signed(x as i64)).collect(),
            AttrValue::UInt(v) => v.iter().map(|&x| Number::Unsigned(x as u64)).collect(),
            AttrValue::Int64(v) => v.iter().map(|&x| Number::Signed(x)).collect(),
            AttrValue::UInt64(v) => v.iter().map(|&x| Number::Unsigned(x)).collect(),
            AttrValue::Float(v) => v.iter().map(|&x| Number::from_f32(x)).collect(),
            AttrValue::Double(v) => v.iter().map(|&x| Number::Float(x)).collect(),
            AttrValue::Text(_) | AttrValue::Strings(_) => return None,
        };
        Some(numbers)
    }

    /// The single numeric element of a scalar attribute.
    pub fn scalar(&self) -> Option<Number> {
        match self.numbers() {
            Some(numbers) if numbers.len() == 1 => numbers.into_iter().next(),
            _ => None,
        }
    }

    /// Text of a `char` attribute or a single-valued `string` attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Strings(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// Verbatim rendering used when an attribute is carried as free text.
    /// Array elements are joined with a single space.
    pub fn to_display_string(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Strings(v) => v.join(" "),
            _ => self
                .numbers()
                .unwrap_or_default()
                .iter()
                .map(Number::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(vec![v])
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(vec![v])
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(vec![v])
    }
}

impl From<i16> for AttrValue {
    fn from(v: i16) -> Self {
        AttrValue::Short(vec![v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_widening_uses_shortest_repr() {
        let value = AttrValue::Float(vec![0.01]);
        assert_eq!(value.scalar(), Some(Number::Float(0.01)));
    }

    #[test]
    fn test_display_joins_arrays() {
        let value = AttrValue::Byte(vec![0, 1, 2]);
        assert_eq!(value.to_display_string(), "0 1 2");

        let value = AttrValue::Double(vec![-9999.0]);
        assert_eq!(value.to_display_string(), "-9999.0");

        let value = AttrValue::Float(vec![f32::NAN]);
        assert_eq!(value.to_display_string(), "NaN");
    }

    #[test]
    fn test_scalar_rejects_arrays_and_text() {
        assert_eq!(AttrValue::Int(vec![1, 2]).scalar(), None);
        assert_eq!(AttrValue::from("1").scalar(), None);
        assert_eq!(AttrValue::Int(vec![7]).scalar(), Some(Number::Signed(7)));
    }

    #[test]
    fn test_number_json_keeps_integer_form() {
        assert_eq!(Number::Signed(-5).to_json().unwrap().to_string(), "-5");
        assert_eq!(Number::Float(1.0).to_json().unwrap().to_string(), "1.0");
        assert!(Number::Float(f64::NAN).to_json().is_none());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(AttrValue::from("kelvin").as_text(), Some("kelvin"));
        assert_eq!(
            AttrValue::Strings(vec!["a".into(), "b".into()]).as_text(),
            None
        );
    }
}
