//! Attribute value coercion into typed JSON values.
//!
//! Integer types accept integral values within the type's range, float types
//! accept finite values within range, text types accept text. Everything else
//! is a [`TypeCoercionError`].

use serde_json::Value;
use ummvar_common::{AttrValue, DataType, Number};

use crate::error::TypeCoercionError;

/// Coerce a single-valued attribute into a JSON value of `dtype`.
pub fn coerce_scalar(
    attribute: &str,
    value: &AttrValue,
    dtype: &DataType,
) -> Result<Value, TypeCoercionError> {
    if let DataType::UserDefined(_) = dtype {
        return Err(unsupported(attribute, dtype));
    }

    if dtype.is_textual() {
        return match value.as_text() {
            Some(text) => Ok(Value::String(text.to_string())),
            None => Err(TypeCoercionError::NumericForText {
                attribute: attribute.to_string(),
                value: value.to_display_string(),
            }),
        };
    }

    let number = single_number(attribute, value, dtype)?;
    coerce_number(attribute, number, dtype).map(Value::Number)
}

/// Coerce one number into `dtype` (numeric types only).
pub fn coerce_number(
    attribute: &str,
    number: Number,
    dtype: &DataType,
) -> Result<serde_json::Number, TypeCoercionError> {
    let value = number.as_f64();
    if !value.is_finite() {
        return Err(TypeCoercionError::NonFinite {
            attribute: attribute.to_string(),
            value: number.to_string(),
        });
    }

    if let Some((min, max)) = dtype.integer_range() {
        if !number.is_integral() {
            return Err(TypeCoercionError::Fractional {
                attribute: attribute.to_string(),
                value: number.to_string(),
                dtype: dtype.umm_name().to_string(),
            });
        }
        let integer = match number {
            Number::Signed(v) => v as i128,
            Number::Unsigned(v) => v as i128,
            Number::Float(v) => v as i128,
        };
        if integer < min || integer > max {
            return Err(out_of_range(attribute, number, dtype));
        }
        return Ok(if integer < 0 {
            serde_json::Number::from(integer as i64)
        } else {
            serde_json::Number::from(integer as u64)
        });
    }

    match dtype {
        DataType::Float if value.abs() > f32::MAX as f64 => Err(out_of_range(attribute, number, dtype)),
        DataType::Float | DataType::Double => serde_json::Number::from_f64(value)
            .ok_or_else(|| out_of_range(attribute, number, dtype)),
        _ => Err(unsupported(attribute, dtype)),
    }
}

/// Coerce a single-valued numeric attribute in its own declared type, for
/// attributes such as `scale_factor` whose type is independent of the
/// variable's storage type.
pub fn coerce_own_scalar(attribute: &str, value: &AttrValue) -> Result<serde_json::Number, TypeCoercionError> {
    let own_type = match value {
        AttrValue::Byte(_) => DataType::Byte,
        AttrValue::UByte(_) => DataType::UByte,
        AttrValue::Short(_) => DataType::Short,
        AttrValue::UShort(_) => DataType::UShort,
        AttrValue::Int(_) => DataType::Int,
        AttrValue::UInt(_) => DataType::UInt,
        AttrValue::Int64(_) => DataType::Int64,
        AttrValue::UInt64(_) => DataType::UInt64,
        AttrValue::Float(_) => DataType::Float,
        AttrValue::Double(_) => DataType::Double,
        AttrValue::Text(_) | AttrValue::Strings(_) => DataType::Double,
    };
    let number = single_number(attribute, value, &own_type)?;
    coerce_number(attribute, number, &own_type)
}

/// Coerce a two-element attribute (`valid_range`) into `dtype`.
pub fn coerce_pair(
    attribute: &str,
    value: &AttrValue,
    dtype: &DataType,
) -> Result<(serde_json::Number, serde_json::Number), TypeCoercionError> {
    if dtype.is_textual() || matches!(dtype, DataType::UserDefined(_)) {
        return Err(unsupported(attribute, dtype));
    }
    let numbers = value.numbers().ok_or_else(|| text_for_numeric(attribute, value, dtype))?;
    if numbers.len() != 2 {
        return Err(TypeCoercionError::WrongLength {
            attribute: attribute.to_string(),
            expected: 2,
            found: numbers.len(),
        });
    }
    Ok((
        coerce_number(attribute, numbers[0], dtype)?,
        coerce_number(attribute, numbers[1], dtype)?,
    ))
}

/// Coerce a single-valued attribute into a numeric `dtype`.
pub fn coerce_bound(
    attribute: &str,
    value: &AttrValue,
    dtype: &DataType,
) -> Result<serde_json::Number, TypeCoercionError> {
    if dtype.is_textual() || matches!(dtype, DataType::UserDefined(_)) {
        return Err(unsupported(attribute, dtype));
    }
    let number = single_number(attribute, value, dtype)?;
    coerce_number(attribute, number, dtype)
}

fn single_number(attribute: &str, value: &AttrValue, dtype: &DataType) -> Result<Number, TypeCoercionError> {
    let numbers = value.numbers().ok_or_else(|| text_for_numeric(attribute, value, dtype))?;
    match numbers.as_slice() {
        [single] => Ok(*single),
        _ => Err(TypeCoercionError::WrongLength {
            attribute: attribute.to_string(),
            expected: 1,
            found: numbers.len(),
        }),
    }
}

fn text_for_numeric(attribute: &str, value: &AttrValue, dtype: &DataType) -> TypeCoercionError {
    TypeCoercionError::TextForNumeric {
        attribute: attribute.to_string(),
        value: value.to_display_string(),
        dtype: dtype.umm_name().to_string(),
    }
}

fn out_of_range(attribute: &str, number: Number, dtype: &DataType) -> TypeCoercionError {
    TypeCoercionError::OutOfRange {
        attribute: attribute.to_string(),
        value: number.to_string(),
        dtype: dtype.umm_name().to_string(),
    }
}

fn unsupported(attribute: &str, dtype: &DataType) -> TypeCoercionError {
    let dtype = match dtype {
        DataType::UserDefined(name) => name.clone(),
        other => other.umm_name().to_string(),
    };
    TypeCoercionError::UnsupportedType {
        attribute: attribute.to_string(),
        dtype,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_fill_on_double() {
        let value = coerce_scalar("_FillValue", &AttrValue::Double(vec![-9999.0]), &DataType::Double).unwrap();
        assert_eq!(value, json!(-9999.0));
        assert_eq!(value.to_string(), "-9999.0");
    }

    #[test]
    fn test_integer_fill_widens_to_float_type() {
        let value = coerce_scalar("_FillValue", &AttrValue::Int(vec![-9999]), &DataType::Float).unwrap();
        assert_eq!(value.to_string(), "-9999.0");
    }

    #[test]
    fn test_integral_float_fill_on_short() {
        let value = coerce_scalar("_FillValue", &AttrValue::Double(vec![-32767.0]), &DataType::Short).unwrap();
        assert_eq!(value, json!(-32767));
    }

    #[test]
    fn test_nan_rejected() {
        let err = coerce_scalar("_FillValue", &AttrValue::Float(vec![f32::NAN]), &DataType::Float).unwrap_err();
        assert!(matches!(err, TypeCoercionError::NonFinite { .. }));
        assert_eq!(err.attribute(), "_FillValue");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = coerce_scalar("_FillValue", &AttrValue::Int64(vec![3_000_000_000]), &DataType::Int).unwrap_err();
        assert!(matches!(err, TypeCoercionError::OutOfRange { .. }));

        let err = coerce_scalar("_FillValue", &AttrValue::Int(vec![-1]), &DataType::UByte).unwrap_err();
        assert!(matches!(err, TypeCoercionError::OutOfRange { .. }));

        let err = coerce_scalar("_FillValue", &AttrValue::Double(vec![1e40]), &DataType::Float).unwrap_err();
        assert!(matches!(err, TypeCoercionError::OutOfRange { .. }));
    }

    #[test]
    fn test_fractional_for_integer_rejected() {
        let err = coerce_scalar("_FillValue", &AttrValue::Double(vec![0.5]), &DataType::Int).unwrap_err();
        assert!(matches!(err, TypeCoercionError::Fractional { .. }));
    }

    #[test]
    fn test_text_and_compound_rejected() {
        let err = coerce_scalar("_FillValue", &AttrValue::Text("none".into()), &DataType::Float).unwrap_err();
        assert!(matches!(err, TypeCoercionError::TextForNumeric { .. }));

        let err = coerce_scalar("_FillValue", &AttrValue::Int(vec![0]), &DataType::UserDefined("obs_t".into()))
            .unwrap_err();
        assert_eq!(
            err,
            TypeCoercionError::UnsupportedType {
                attribute: "_FillValue".into(),
                dtype: "obs_t".into()
            }
        );
    }

    #[test]
    fn test_text_fill_on_string() {
        let value = coerce_scalar("_FillValue", &AttrValue::Text("N/A".into()), &DataType::String).unwrap();
        assert_eq!(value, json!("N/A"));
        assert!(coerce_scalar("_FillValue", &AttrValue::Int(vec![0]), &DataType::Char).is_err());
    }

    #[test]
    fn test_own_scalar_keeps_attribute_type() {
        let scale = coerce_own_scalar("scale_factor", &AttrValue::Float(vec![0.01])).unwrap();
        assert_eq!(scale.to_string(), "0.01");
        let offset = coerce_own_scalar("add_offset", &AttrValue::Short(vec![20])).unwrap();
        assert_eq!(offset.to_string(), "20");
        assert!(coerce_own_scalar("scale_factor", &AttrValue::Text("1".into())).is_err());
    }

    #[test]
    fn test_pair_requires_two_values() {
        let (min, max) = coerce_pair("valid_range", &AttrValue::Float(vec![-180.0, 180.0]), &DataType::Float).unwrap();
        assert_eq!((min.to_string(), max.to_string()), ("-180.0".to_string(), "180.0".to_string()));

        let err = coerce_pair("valid_range", &AttrValue::Float(vec![1.0]), &DataType::Float).unwrap_err();
        assert!(matches!(err, TypeCoercionError::WrongLength { expected: 2, found: 1, .. }));
    }
}
