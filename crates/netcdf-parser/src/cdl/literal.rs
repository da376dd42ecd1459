//! Attribute value literals.
//!
//! CDL encodes the attribute type in the literal suffix: `1b` byte, `1ub`
//! ubyte, `1s` short, `1us` ushort, `1` int, `1u` uint, `1LL` int64, `1ULL`
//! uint64, `1.f` float, `1.` double. `NaN`, `Infinity` and their `f`-suffixed
//! float spellings are accepted as well.

use ummvar_common::{AttrValue, DataType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Literal {
    Int(i128),
    Float(f64),
}

/// Numeric element type implied by a literal's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NumKind {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
}

impl NumKind {
    fn from_data_type(dtype: &DataType) -> Option<Self> {
        let kind = match dtype {
            DataType::Byte => NumKind::Byte,
            DataType::UByte => NumKind::UByte,
            DataType::Short => NumKind::Short,
            DataType::UShort => NumKind::UShort,
            DataType::Int => NumKind::Int,
            DataType::UInt => NumKind::UInt,
            DataType::Int64 => NumKind::Int64,
            DataType::UInt64 => NumKind::UInt64,
            DataType::Float => NumKind::Float,
            DataType::Double => NumKind::Double,
            _ => return None,
        };
        Some(kind)
    }

    fn is_float(self) -> bool {
        matches!(self, NumKind::Float | NumKind::Double)
    }
}

/// Parse one numeric literal word into its value and implied kind.
pub(crate) fn parse_number(word: &str) -> Option<(Literal, NumKind)> {
    if let Some(special) = parse_special_float(word) {
        return Some(special);
    }

    let lower = word.to_ascii_lowercase();
    let looks_float = lower.contains('.')
        || (lower.contains('e') && !lower.starts_with("0x"))
        || lower.ends_with('f');

    if looks_float {
        let (body, kind) = match lower.strip_suffix('f') {
            Some(body) => (body, NumKind::Float),
            None => (lower.strip_suffix('d').unwrap_or(&lower), NumKind::Double),
        };
        let value = body.parse::<f64>().ok()?;
        return Some((Literal::Float(value), kind));
    }

    const INT_SUFFIXES: [(&str, NumKind); 8] = [
        ("ull", NumKind::UInt64),
        ("ll", NumKind::Int64),
        ("ub", NumKind::UByte),
        ("us", NumKind::UShort),
        ("b", NumKind::Byte),
        ("s", NumKind::Short),
        ("u", NumKind::UInt),
        ("l", NumKind::Int),
    ];

    let (body, kind) = INT_SUFFIXES
        .iter()
        .find_map(|(suffix, kind)| lower.strip_suffix(suffix).map(|b| (b, *kind)))
        .unwrap_or((lower.as_str(), NumKind::Int));

    let value = body.parse::<i128>().ok()?;
    Some((Literal::Int(value), kind))
}

fn parse_special_float(word: &str) -> Option<(Literal, NumKind)> {
    let (body, kind) = match word.strip_suffix('f') {
        Some(body) => (body, NumKind::Float),
        None => (word, NumKind::Double),
    };
    let value = match body {
        "NaN" | "nan" => f64::NAN,
        "Infinity" | "+Infinity" | "inf" => f64::INFINITY,
        "-Infinity" | "-inf" => f64::NEG_INFINITY,
        _ => return None,
    };
    Some((Literal::Float(value), kind))
}

/// Build an attribute value from a list of numeric literals.
///
/// An explicit type from the statement prefix wins; otherwise the widest
/// literal kind is used, with any float promoting the list to double unless
/// every element is a float literal.
pub(crate) fn build_numeric(
    literals: &[(Literal, NumKind)],
    declared: Option<&DataType>,
) -> Option<AttrValue> {
    let kind = match declared.and_then(NumKind::from_data_type) {
        Some(kind) => kind,
        None => {
            let first = literals.first()?.1;
            if literals.iter().all(|(_, k)| *k == first) {
                first
            } else if literals.iter().any(|(_, k)| k.is_float()) {
                NumKind::Double
            } else {
                literals.iter().map(|(_, k)| *k).max()?
            }
        }
    };

    let values = literals.iter().map(|(lit, _)| *lit);
    let value = match kind {
        NumKind::Byte => AttrValue::Byte(values.map(|v| as_int(v) as i8).collect()),
        NumKind::UByte => AttrValue::UByte(values.map(|v| as_int(v) as u8).collect()),
        NumKind::Short => AttrValue::Short(values.map(|v| as_int(v) as i16).collect()),
        NumKind::UShort => AttrValue::UShort(values.map(|v| as_int(v) as u16).collect()),
        NumKind::Int => AttrValue::Int(values.map(|v| as_int(v) as i32).collect()),
        NumKind::UInt => AttrValue::UInt(values.map(|v| as_int(v) as u32).collect()),
        NumKind::Int64 => AttrValue::Int64(values.map(|v| as_int(v) as i64).collect()),
        NumKind::UInt64 => AttrValue::UInt64(values.map(|v| as_int(v) as u64).collect()),
        NumKind::Float => AttrValue::Float(values.map(|v| as_float(v) as f32).collect()),
        NumKind::Double => AttrValue::Double(values.map(as_float).collect()),
    };
    Some(value)
}

fn as_int(lit: Literal) -> i128 {
    match lit {
        Literal::Int(v) => v,
        Literal::Float(v) => v as i128,
    }
}

fn as_float(lit: Literal) -> f64 {
    match lit {
        Literal::Int(v) => v as f64,
        Literal::Float(v) => v,
    }
}
