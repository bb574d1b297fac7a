// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Values stored inside a [Row]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use arrow::datatypes::{validate_decimal_precision_and_scale, Decimal128Type, DecimalType};
use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::RowError;
use crate::row::Row;

/// A single value held by a [Row].
///
/// Floating point values compare the way Spark rows do: `NaN` equals `NaN`
/// and `0.0` equals `-0.0`. Values of different variants are never equal,
/// so `Integer(53)` and `Long(53)` are two different values.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    String(String),
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Binary(Vec<u8>),
    Struct(Row),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Integer(_) => "integer",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Binary(_) => "binary",
            Value::Struct(_) => "struct",
        }
    }

    /// Integral payload of any integer variant
    pub(crate) fn as_integral(&self) -> Option<i128> {
        match self {
            Value::Byte(v) => Some(*v as i128),
            Value::Short(v) => Some(*v as i128),
            Value::Integer(v) => Some(*v as i128),
            Value::Long(v) => Some(*v as i128),
            _ => None,
        }
    }
}

fn canonical_f64_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

fn canonical_f32_bits(v: f32) -> u32 {
    if v == 0.0 {
        0.0f32.to_bits()
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Double(a), Value::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::String(v) => v.hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Float(v) => canonical_f32_bits(*v).hash(state),
            Value::Double(v) => canonical_f64_bits(*v).hash(state),
            Value::Decimal(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
            Value::Timestamp(v) => v.hash(state),
            Value::Binary(v) => v.hash(state),
            Value::Struct(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from_value {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_from_value!(String, String);
impl_from_value!(bool, Boolean);
impl_from_value!(i8, Byte);
impl_from_value!(i16, Short);
impl_from_value!(i32, Integer);
impl_from_value!(i64, Long);
impl_from_value!(f32, Float);
impl_from_value!(f64, Double);
impl_from_value!(Decimal, Decimal);
impl_from_value!(NaiveDate, Date);
impl_from_value!(DateTime<Utc>, Timestamp);
impl_from_value!(Vec<u8>, Binary);
impl_from_value!(Row, Struct);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A fixed point decimal number: `value * 10^-scale`.
///
/// `precision` is the number of significant digits the value may use. Two
/// decimals are equal when both the unscaled value and the scale match, so
/// `1.0` and `1.00` are different values.
#[derive(Clone, Copy, Debug)]
pub struct Decimal {
    value: i128,
    precision: u8,
    scale: i8,
}

impl Decimal {
    pub fn try_new(value: i128, precision: u8, scale: i8) -> Result<Decimal, RowError> {
        if scale < 0 {
            return Err(RowError::TypeMismatch(format!(
                "invalid decimal scale {}",
                scale
            )));
        }
        validate_decimal_precision_and_scale::<Decimal128Type>(precision, scale)
            .and_then(|_| Decimal128Type::validate_decimal_precision(value, precision))
            .map_err(|err| RowError::TypeMismatch(err.to_string()))?;

        Ok(Decimal {
            value,
            precision,
            scale,
        })
    }

    /// Unscaled integer value
    pub fn value(&self) -> i128 {
        self.value
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> i8 {
        self.scale
    }

    /// Move to another precision and scale without losing digits.
    ///
    /// Returns `None` when the value would need rounding or does not fit.
    pub fn rescale(&self, precision: u8, scale: i8) -> Option<Decimal> {
        let diff = scale as i32 - self.scale as i32;
        let value = if diff >= 0 {
            self.value.checked_mul(10i128.checked_pow(diff as u32)?)?
        } else {
            let factor = 10i128.checked_pow((-diff) as u32)?;
            if self.value % factor != 0 {
                return None;
            }
            self.value / factor
        };

        Decimal::try_new(value, precision, scale).ok()
    }

    pub fn to_f64(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.scale as i32)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.scale == other.scale
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.scale.hash(state);
    }
}

/// Plain notation with exactly `scale` fractional digits
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Decimal128Type::format_decimal(
            self.value,
            self.precision,
            self.scale,
        ))
    }
}

/// Parses plain decimal text such as `-12.50`. The precision is the number
/// of digits written, and at least the scale.
impl FromStr for Decimal {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RowError::TypeMismatch(format!("'{}' is not a decimal number", s));

        let s = s.trim();
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if (int_part.is_empty() && frac_part.is_empty())
            || !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let significant = digits.trim_start_matches('0').len().max(1);
        let scale = i8::try_from(frac_part.len()).map_err(|_| invalid())?;
        let precision = u8::try_from(significant.max(frac_part.len()).max(1))
            .map_err(|_| invalid())?;

        let mut value: i128 = digits.parse().map_err(|_| invalid())?;
        if negative {
            value = -value;
        }

        Decimal::try_new(value, precision, scale)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_float_equality() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_eq!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(hash_of(&Value::Double(0.0)), hash_of(&Value::Double(-0.0)));
        assert_eq!(
            hash_of(&Value::Float(f32::NAN)),
            hash_of(&Value::Float(-f32::NAN))
        );
        assert_ne!(Value::Double(0.45), Value::Float(0.45));
    }

    #[test]
    fn test_cross_type_values_differ() {
        assert_ne!(Value::Integer(53), Value::Long(53));
        assert_ne!(Value::Null, Value::String("null".to_string()));
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::String("Bon".into()), Value::from("Bon"));
        assert_eq!(Value::Integer(53), Value::from(53));
        assert_eq!(Value::Null, Value::from(None::<f64>));
        assert_eq!(Value::Double(161.6), Value::from(Some(161.6)));
        assert_eq!(Value::Binary(vec![1, 2]), Value::from(&[1u8, 2][..]));
    }

    #[test]
    fn test_decimal_display() {
        let d = Decimal::try_new(30000000011, 12, 2).unwrap();
        assert_eq!("300000000.11", d.to_string());

        let d = Decimal::try_new(-5, 3, 2).unwrap();
        assert_eq!("-0.05", d.to_string());

        let d = Decimal::try_new(42, 10, 0).unwrap();
        assert_eq!("42", d.to_string());

        let d = Decimal::try_new(5, 3, 3).unwrap();
        assert_eq!("0.005", d.to_string());
    }

    #[test]
    fn test_decimal_parse() {
        let d: Decimal = "0.45".parse().unwrap();
        assert_eq!((45, 2, 2), (d.value(), d.precision(), d.scale()));

        let d: Decimal = "-120.500".parse().unwrap();
        assert_eq!((-120500, 6, 3), (d.value(), d.precision(), d.scale()));
        assert_eq!("-120.500", d.to_string());

        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
        assert!("abc".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_decimal_rescale() {
        let d: Decimal = "12.5".parse().unwrap();

        let wider = d.rescale(10, 3).unwrap();
        assert_eq!(12500, wider.value());
        assert_eq!("12.500", wider.to_string());

        assert_eq!(d, wider.rescale(3, 1).unwrap());
        assert!(d.rescale(10, 0).is_none());
        assert!(d.rescale(2, 1).is_none());
    }

    #[test]
    fn test_decimal_precision_bounds() {
        assert!(Decimal::try_new(999, 3, 0).is_ok());
        assert!(Decimal::try_new(1000, 3, 0).is_err());
        assert!(Decimal::try_new(1, 39, 0).is_err());
        assert!(Decimal::try_new(1, 3, 4).is_err());
        assert!(Decimal::try_new(-999, 3, 0).is_ok());
        assert!(Decimal::try_new(-1000, 3, 0).is_err());
        assert!(Decimal::try_new(1, 3, -1).is_err());
    }
}
