//! Leaf converters installed in every `Registry::new()`.
//!
//! Each one parses `FieldData::tag` with the natural text form of its kind
//! and writes the result through the field's `set_*` hook.

use serde::de::DeserializeOwned;

use crate::duration::parse_duration;
use crate::error::ConvertError;
use crate::field::FieldData;

/// `"true"` is true; any other text is false.
pub fn bool_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value = field.tag() == "true";
    field.value_mut().set_bool(value)
}

/// Base-10 signed integer, optional sign.
pub fn int_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value: i128 = field
        .tag()
        .parse()
        .map_err(|e| ConvertError::parse("integer", field.tag(), e))?;
    field.value_mut().set_int(value)
}

/// Base-10 unsigned integer, no sign.
pub fn uint_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let text = field.tag();
    if text.starts_with('+') {
        return Err(ConvertError::parse("unsigned integer", text, "sign not allowed"));
    }
    let value: u128 = text
        .parse()
        .map_err(|e| ConvertError::parse("unsigned integer", text, e))?;
    field.value_mut().set_uint(value)
}

/// Decimal float with optional fraction and exponent.
pub fn float_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value: f64 = field
        .tag()
        .parse()
        .map_err(|e| ConvertError::parse("float", field.tag(), e))?;
    field.value_mut().set_float(value)
}

/// The annotation text verbatim.
pub fn string_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value = field.tag().to_owned();
    field.value_mut().set_str(&value)
}

/// Raw bytes of the annotation text, for `Vec<u8>`.
pub fn bytes_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value = field.tag().as_bytes().to_vec();
    field.set(value)
}

/// Duration literal, for `std::time::Duration`.
pub fn duration_converter(field: &mut FieldData<'_>) -> Result<(), ConvertError> {
    let value = parse_duration(field.tag())?;
    field.set(value)
}

/// Parser decoding the annotation as JSON, for use with
/// `Registry::register_parser`.
///
/// ```ignore
/// registry.register_parser::<Vec<Child>, _>(structfill::convert::json);
/// ```
pub fn json<T: DeserializeOwned>(text: &str) -> Result<T, ConvertError> {
    serde_json::from_str(text).map_err(|e| ConvertError::parse("json", text, e))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::field::FieldPath;

    fn run<T: crate::Fill>(
        converter: fn(&mut FieldData<'_>) -> Result<(), ConvertError>,
        value: &mut T,
        tag: &str,
    ) -> Result<(), ConvertError> {
        let mut field = FieldData::new(value, tag, FieldPath::root());
        converter(&mut field)
    }

    #[test]
    fn bool_accepts_only_literal_true() {
        let mut flag = false;
        run(bool_converter, &mut flag, "true").unwrap();
        assert!(flag);

        run(bool_converter, &mut flag, "TRUE").unwrap();
        assert!(!flag);
    }

    #[test]
    fn integers_parse_base_ten() {
        let mut count = 0i32;
        run(int_converter, &mut count, "-33").unwrap();
        assert_eq!(count, -33);

        let mut count = 0i64;
        run(int_converter, &mut count, "+64").unwrap();
        assert_eq!(count, 64);

        let mut unsigned = 0u8;
        run(uint_converter, &mut unsigned, "18").unwrap();
        assert_eq!(unsigned, 18);

        let mut big = 0i128;
        run(int_converter, &mut big, "-170141183460469231731687303715884105728").unwrap();
        assert_eq!(big, i128::MIN);

        let mut ubig = 0u128;
        run(uint_converter, &mut ubig, "340282366920938463463374607431768211455").unwrap();
        assert_eq!(ubig, u128::MAX);
    }

    #[test]
    fn malformed_integer_leaves_zero() {
        let mut count = 0i32;
        let err = run(int_converter, &mut count, "0x10").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { kind: "integer", .. }), "{err}");
        assert_eq!(count, 0);

        let mut unsigned = 0u32;
        assert!(run(uint_converter, &mut unsigned, "-1").is_err());
        assert_eq!(unsigned, 0);

        let err = run(uint_converter, &mut unsigned, "+5").unwrap_err();
        assert!(
            matches!(err, ConvertError::Parse { kind: "unsigned integer", .. }),
            "{err}"
        );
        assert_eq!(unsigned, 0);
    }

    #[test]
    fn out_of_width_integer_leaves_zero() {
        let mut small = 0u8;
        let err = run(uint_converter, &mut small, "256").unwrap_err();
        assert_eq!(err, ConvertError::out_of_range(256u64, "u8"));
        assert_eq!(small, 0);
    }

    #[test]
    fn floats_accept_exponents() {
        let mut value = 0.0f64;
        run(float_converter, &mut value, "6.4").unwrap();
        assert_eq!(value, 6.4);

        run(float_converter, &mut value, "1.5e3").unwrap();
        assert_eq!(value, 1500.0);

        let mut narrow = 0.0f32;
        run(float_converter, &mut narrow, "3.2").unwrap();
        assert_eq!(narrow, 3.2f32);
    }

    #[test]
    fn text_and_bytes_are_verbatim() {
        let mut text = String::new();
        run(string_converter, &mut text, "foo bar").unwrap();
        assert_eq!(text, "foo bar");

        let mut bytes = Vec::<u8>::new();
        run(bytes_converter, &mut bytes, "bar").unwrap();
        assert_eq!(bytes, b"bar");
    }

    #[test]
    fn duration_literal() {
        let mut timeout = Duration::ZERO;
        run(duration_converter, &mut timeout, "1s").unwrap();
        assert_eq!(timeout.as_nanos(), 1_000_000_000);
    }

    #[test]
    fn kind_converter_on_wrong_type_is_unsupported() {
        let mut text = String::new();
        let err = run(int_converter, &mut text, "5").unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { .. }), "{err}");
    }

    #[test]
    fn json_parser_reports_input() {
        let values: Vec<u32> = json("[1, 2, 3]").unwrap();
        assert_eq!(values, [1, 2, 3]);

        let err = json::<Vec<u32>>("[1,").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { kind: "json", .. }), "{err}");
    }
}
