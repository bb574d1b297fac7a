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

//! A schema-typed [Row]
//!
//! A [Row] is an immutable, fixed-length tuple of [Value] bound to one
//! [StructType]. Rows are created with [Row::create], which checks every
//! value against its field and either returns a complete row or an error.
//!
//! # Example
//!
//! ```rust
//! let schema = Arc::new(StructType::from_ddl("surname string, age int, married boolean")?);
//!
//! let row = Row::create(vec!["Jovi".into(), Value::from(53), true.into()], schema)?;
//!
//! assert_eq!(53, row.get_int(1)?);
//! assert_eq!("Jovi,53,true", row.mk_string(","));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::RowError;
use crate::format::{write_values, FormatOptions};
use crate::types::{DataType, StructField, StructType};
use crate::value::{Decimal, Value};

/// An immutable row of values typed by a shared [StructType]
#[derive(Clone, Debug)]
pub struct Row {
    values: Vec<Value>,
    schema: Arc<StructType>,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $declared:pat, $read_as:literal, $value:pat => $out:expr, $ret:ty) => {
        $(#[$doc])*
        pub fn $name(&self, index: usize) -> Result<$ret, RowError> {
            let field = self.schema.field(index)?;
            if !matches!(field.data_type, $declared) {
                return Err(RowError::TypeMismatch(format!(
                    "field '{}' of type {} cannot be read as {}",
                    field.name, field.data_type, $read_as
                )));
            }

            match &self.values[index] {
                Value::Null => Err(RowError::NullValue(index)),
                $value => Ok($out),
                other => Err(RowError::type_mismatch(
                    &field.name,
                    &field.data_type,
                    other.kind(),
                )),
            }
        }
    };
}

impl Row {
    /// Build a row from `values` laid out in the field order of `schema`.
    ///
    /// Values are converted to their declared type when that can be done
    /// without loss (an `i64` of `53` into an `Integer` field, a whole
    /// `f64` into a `Long` field, an integer into a `Decimal` field).
    /// Anything else fails with [RowError::TypeMismatch], and a wrong
    /// number of values fails with [RowError::ArityMismatch].
    pub fn create(values: Vec<Value>, schema: Arc<StructType>) -> Result<Row, RowError> {
        if values.len() != schema.field_count() {
            return Err(RowError::ArityMismatch {
                expected: schema.field_count(),
                actual: values.len(),
            });
        }

        let values = values
            .into_iter()
            .zip(schema.fields())
            .enumerate()
            .map(|(index, (value, field))| {
                coerce(value, field).inspect_err(|err| {
                    tracing::debug!(index, field = %field.name, error = %err, "row value rejected");
                })
            })
            .collect::<Result<Vec<_>, RowError>>()?;

        Ok(Row { values, schema })
    }

    /// Build a row from `(name, value)` pairs. Fields that are not named are null,
    /// and a later pair for the same name replaces an earlier one.
    pub fn try_from_named<S, I>(pairs: I, schema: Arc<StructType>) -> Result<Row, RowError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Value)>,
    {
        let mut values = vec![Value::Null; schema.field_count()];
        for (name, value) in pairs {
            let index = schema.field_index(name.as_ref())?;
            values[index] = value;
        }

        Row::create(values, schema)
    }

    pub fn schema(&self) -> &Arc<StructType> {
        &self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Owned copy of the values in field order
    pub fn to_seq(&self) -> Vec<Value> {
        self.values.clone()
    }

    /// Number of fields in the row
    pub fn length(&self) -> usize {
        self.values.len()
    }

    /// Same as [Row::length]
    pub fn size(&self) -> usize {
        self.length()
    }

    pub fn len(&self) -> usize {
        self.length()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, [Value::Null] when absent
    pub fn get(&self, index: usize) -> Result<&Value, RowError> {
        self.values.get(index).ok_or(RowError::IndexOutOfRange {
            index,
            length: self.values.len(),
        })
    }

    /// Same as [Row::get]
    pub fn apply(&self, index: usize) -> Result<&Value, RowError> {
        self.get(index)
    }

    /// Value of the field called `name`
    pub fn get_as(&self, name: &str) -> Result<&Value, RowError> {
        self.get(self.field_index(name)?)
    }

    /// Values of the named fields keyed by name
    pub fn get_values_map<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<HashMap<String, Value>, RowError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.get_as(name)?.clone()))
            })
            .collect()
    }

    pub fn field_index(&self, name: &str) -> Result<usize, RowError> {
        self.schema.field_index(name)
    }

    pub fn is_null_at(&self, index: usize) -> Result<bool, RowError> {
        Ok(self.get(index)?.is_null())
    }

    /// `true` when any field is null
    pub fn any_null(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    typed_getter!(get_string, DataType::String, "StringType", Value::String(v) => v.as_str(), &str);
    typed_getter!(get_boolean, DataType::Boolean, "BooleanType", Value::Boolean(v) => *v, bool);
    typed_getter!(get_byte, DataType::Byte, "ByteType", Value::Byte(v) => *v, i8);
    typed_getter!(get_short, DataType::Short, "ShortType", Value::Short(v) => *v, i16);
    typed_getter!(get_int, DataType::Integer, "IntegerType", Value::Integer(v) => *v, i32);
    typed_getter!(get_long, DataType::Long, "LongType", Value::Long(v) => *v, i64);
    typed_getter!(get_float, DataType::Float, "FloatType", Value::Float(v) => *v, f32);
    typed_getter!(get_double, DataType::Double, "DoubleType", Value::Double(v) => *v, f64);
    typed_getter!(get_decimal, DataType::Decimal { .. }, "DecimalType", Value::Decimal(v) => *v, Decimal);
    typed_getter!(get_date, DataType::Date, "DateType", Value::Date(v) => *v, NaiveDate);
    typed_getter!(get_timestamp, DataType::Timestamp, "TimestampType", Value::Timestamp(v) => *v, DateTime<Utc>);
    typed_getter!(get_binary, DataType::Binary, "BinaryType", Value::Binary(v) => v.as_slice(), &[u8]);
    typed_getter!(
        /// Nested row of a `Struct` field
        get_struct, DataType::Struct(_), "StructType", Value::Struct(v) => v, &Row
    );

    /// Values rendered as text and joined by `sep`
    pub fn mk_string(&self, sep: &str) -> String {
        self.mk_string_with("", sep, "")
    }

    pub fn mk_string_with(&self, start: &str, sep: &str, end: &str) -> String {
        self.mk_string_with_options(start, sep, end, &FormatOptions::default())
    }

    pub fn mk_string_with_options(
        &self,
        start: &str,
        sep: &str,
        end: &str,
        options: &FormatOptions,
    ) -> String {
        let mut out = String::new();
        write_values(&mut out, &self.values, start, sep, end, options)
            .expect("writing to a String is infallible");
        out
    }

    /// A new row with the same values that shares this row's schema
    pub fn copy(&self) -> Row {
        Row {
            values: self.values.clone(),
            schema: Arc::clone(&self.schema),
        }
    }

    /// Hash of the values in field order, equal for equal rows
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

fn coerce(value: Value, field: &StructField) -> Result<Value, RowError> {
    if value.is_null() {
        if !field.nullable {
            return Err(RowError::TypeMismatch(format!(
                "field '{}' is not nullable but got null",
                field.name
            )));
        }
        return Ok(Value::Null);
    }

    let mismatch = |value: &Value| RowError::type_mismatch(&field.name, &field.data_type, value.kind());

    let coerced = match (&field.data_type, value) {
        (DataType::String, v @ Value::String(_)) => v,
        (DataType::Boolean, v @ Value::Boolean(_)) => v,
        (DataType::Date, v @ Value::Date(_)) => v,
        (DataType::Timestamp, v @ Value::Timestamp(_)) => v,
        (DataType::Binary, v @ Value::Binary(_)) => v,
        (DataType::Byte, v) => whole_number(&v)
            .and_then(|n| i8::try_from(n).ok())
            .map(Value::Byte)
            .ok_or_else(|| mismatch(&v))?,
        (DataType::Short, v) => whole_number(&v)
            .and_then(|n| i16::try_from(n).ok())
            .map(Value::Short)
            .ok_or_else(|| mismatch(&v))?,
        (DataType::Integer, v) => whole_number(&v)
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::Integer)
            .ok_or_else(|| mismatch(&v))?,
        (DataType::Long, v) => whole_number(&v)
            .and_then(|n| i64::try_from(n).ok())
            .map(Value::Long)
            .ok_or_else(|| mismatch(&v))?,
        (DataType::Float, v) => match &v {
            Value::Float(f) => Value::Float(*f),
            // narrowing rounds to the nearest f32, but a finite double must stay finite
            Value::Double(d) if !d.is_finite() || (*d as f32).is_finite() => Value::Float(*d as f32),
            _ => match v.as_integral() {
                Some(n) if (n as f32) as i128 == n => Value::Float(n as f32),
                _ => return Err(mismatch(&v)),
            },
        },
        (DataType::Double, v) => match &v {
            Value::Double(d) => Value::Double(*d),
            Value::Float(f) => Value::Double(*f as f64),
            _ => match v.as_integral() {
                Some(n) if (n as f64) as i128 == n => Value::Double(n as f64),
                _ => return Err(mismatch(&v)),
            },
        },
        (DataType::Decimal { precision, scale }, v) => {
            let decimal = match &v {
                Value::Decimal(d) => d.rescale(*precision, *scale),
                _ => v.as_integral().and_then(|n| {
                    let unscaled = n.checked_mul(10i128.checked_pow(*scale as u32)?)?;
                    Decimal::try_new(unscaled, *precision, *scale).ok()
                }),
            };
            decimal.map(Value::Decimal).ok_or_else(|| mismatch(&v))?
        }
        (DataType::Struct(schema), Value::Struct(row)) => {
            if Arc::ptr_eq(&row.schema, schema) {
                Value::Struct(row)
            } else {
                Value::Struct(Row::create(row.values, Arc::clone(schema))?)
            }
        }
        (_, v) => return Err(mismatch(&v)),
    };

    Ok(coerced)
}

/// Integer payload of `value`, also accepting finite floats with no fraction
fn whole_number(value: &Value) -> Option<i128> {
    let float = match value {
        Value::Float(f) => *f as f64,
        Value::Double(d) => *d,
        other => return other.as_integral(),
    };

    if float.is_finite() && float.fract() == 0.0 && float.abs() < 1e20 {
        Some(float as i128)
    } else {
        None
    }
}

impl Index<usize> for Row {
    type Output = Value;

    /// Panics when `index` is out of range, like slice indexing
    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

/// Rows are equal when they hold equal values in the same positions.
/// The schema is not compared.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

/// Spark's `Row.toString` form: `[v1,v2,...]`
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mk_string_with("[", ",", "]"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::format::DoubleFormat;

    fn rockstars_schema() -> Arc<StructType> {
        Arc::new(
            StructType::new(vec![
                StructField::new("surname", DataType::String, true),
                StructField::new("forename", DataType::String, true),
                StructField::new("age", DataType::Integer, true),
                StructField::new("birthday", DataType::String, true),
                StructField::new("numkids", DataType::Integer, true),
                StructField::new("married", DataType::Boolean, true),
                StructField::new("networth", DataType::Double, true),
                StructField::new("weight", DataType::Float, true),
                StructField::new("percent", DataType::Double, true),
            ])
            .unwrap(),
        )
    }

    fn jovi_values() -> Vec<Value> {
        vec![
            "Jovi".into(),
            "Bon".into(),
            Value::from(53),
            "March 02 1962".into(),
            Value::from(4),
            true.into(),
            Value::from(300000000.11),
            161.6f32.into(),
            Value::from(0.45),
        ]
    }

    fn jovi() -> Row {
        Row::create(jovi_values(), rockstars_schema()).unwrap()
    }

    #[test]
    fn test_accessors() {
        let row = jovi();

        assert_eq!(9, row.length());
        assert_eq!(9, row.size());
        assert_eq!(&Value::from("Bon"), row.get(1).unwrap());
        assert_eq!(&Value::from("Jovi"), row.apply(0).unwrap());
        assert_eq!(&Value::Boolean(true), row.apply(5).unwrap());
        assert!(row.get_boolean(5).unwrap());
        assert_eq!(53, row.get_int(2).unwrap());
        assert_eq!(300000000.11, row.get_double(6).unwrap());
        assert_eq!(161.6f32, row.get_float(7).unwrap());
        assert_eq!(0.45, row.get_double(8).unwrap());
        assert_eq!("March 02 1962", row.get_string(3).unwrap());
        assert_eq!(1, row.field_index("forename").unwrap());
        assert_eq!(&Value::Integer(4), row.get_as("numkids").unwrap());
        assert_eq!(Value::Integer(53), row[2]);
        assert!(!row.any_null());
    }

    #[test]
    fn test_values_round_trip() {
        let values = jovi_values();
        let row = Row::create(values.clone(), rockstars_schema()).unwrap();

        for (idx, value) in values.iter().enumerate() {
            assert_eq!(value, row.get(idx).unwrap());
        }
        assert_eq!(values, row.to_seq());
    }

    #[test]
    fn test_nulls() {
        let mut values = jovi_values();
        values[6] = Value::Null;
        let row = Row::create(values, rockstars_schema()).unwrap();

        assert!(row.is_null_at(6).unwrap());
        assert!(!row.is_null_at(5).unwrap());
        assert!(row.any_null());
        assert!(matches!(row.get_double(6), Err(RowError::NullValue(6))));

        for idx in 0..row.length() {
            assert_eq!(row.is_null_at(idx).unwrap(), row.get(idx).unwrap().is_null());
        }
    }

    #[test]
    fn test_out_of_range_and_missing_field() {
        let row = jovi();

        assert!(matches!(
            row.get(99),
            Err(RowError::IndexOutOfRange { index: 99, length: 9 })
        ));
        assert!(matches!(row.get_int(9), Err(RowError::IndexOutOfRange { .. })));
        assert!(matches!(row.is_null_at(9), Err(RowError::IndexOutOfRange { .. })));
        assert!(matches!(
            row.field_index("nonexistent"),
            Err(RowError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_getter_checks_declared_type() {
        let row = jovi();

        // age is an IntegerType and 53 fits in a long, but the declared type wins
        assert!(matches!(row.get_long(2), Err(RowError::TypeMismatch(_))));
        assert!(matches!(row.get_string(2), Err(RowError::TypeMismatch(_))));
        assert!(matches!(row.get_float(6), Err(RowError::TypeMismatch(_))));
        assert!(matches!(row.get_struct(6), Err(RowError::TypeMismatch(_))));
        assert!(matches!(row.get_date(3), Err(RowError::TypeMismatch(_))));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut values = jovi_values();
        values.pop();

        assert!(matches!(
            Row::create(values, rockstars_schema()),
            Err(RowError::ArityMismatch {
                expected: 9,
                actual: 8
            })
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let mut values = jovi_values();
        values[2] = "fifty three".into();
        assert!(matches!(
            Row::create(values, rockstars_schema()),
            Err(RowError::TypeMismatch(_))
        ));

        let mut values = jovi_values();
        values[2] = Value::from(53.5);
        assert!(matches!(
            Row::create(values, rockstars_schema()),
            Err(RowError::TypeMismatch(_))
        ));

        let mut values = jovi_values();
        values[5] = Value::from(1);
        assert!(matches!(
            Row::create(values, rockstars_schema()),
            Err(RowError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_numeric_coercion() {
        let schema = Arc::new(
            StructType::from_ddl("b tinyint, s smallint, i int, l bigint, f float, d double, m decimal(6,2)")
                .unwrap(),
        );

        let row = Row::create(
            vec![
                Value::Long(7),
                Value::Integer(-300),
                Value::Double(53.0),
                Value::Integer(9),
                Value::Double(0.5),
                Value::Long(3),
                Value::Integer(12),
            ],
            Arc::clone(&schema),
        )
        .unwrap();

        assert_eq!(7, row.get_byte(0).unwrap());
        assert_eq!(-300, row.get_short(1).unwrap());
        assert_eq!(53, row.get_int(2).unwrap());
        assert_eq!(9, row.get_long(3).unwrap());
        assert_eq!(0.5, row.get_float(4).unwrap());
        assert_eq!(3.0, row.get_double(5).unwrap());
        assert_eq!("12.00", row.get_decimal(6).unwrap().to_string());

        let overflow = Row::create(
            vec![
                Value::Integer(300),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
            ],
            Arc::clone(&schema),
        );
        assert!(matches!(overflow, Err(RowError::TypeMismatch(_))));

        let lossy_decimal = Row::create(
            vec![
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Decimal("1.125".parse().unwrap()),
            ],
            schema,
        );
        assert!(matches!(lossy_decimal, Err(RowError::TypeMismatch(_))));
    }

    #[test]
    fn test_double_narrows_into_float_field() {
        let mut values = jovi_values();
        values[7] = Value::from(161.6);
        let row = Row::create(values, rockstars_schema()).unwrap();

        assert_eq!(161.6f32, row.get_float(7).unwrap());
        assert_eq!(&Value::Float(161.6), row.get(7).unwrap());
        assert_eq!(
            "Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6,0.45",
            row.mk_string(",")
        );

        let schema = Arc::new(StructType::from_ddl("weight float").unwrap());
        let row = Row::create(vec![Value::from(0.45)], Arc::clone(&schema)).unwrap();
        assert_eq!(0.45f32, row.get_float(0).unwrap());

        let row = Row::create(vec![Value::from(f64::INFINITY)], Arc::clone(&schema)).unwrap();
        assert_eq!(f32::INFINITY, row.get_float(0).unwrap());

        assert!(matches!(
            Row::create(vec![Value::from(1e300)], schema),
            Err(RowError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_non_nullable_field() {
        let schema = Arc::new(StructType::from_ddl("id bigint NOT NULL, name string").unwrap());

        assert!(Row::create(vec![1i64.into(), Value::Null], Arc::clone(&schema)).is_ok());
        assert!(matches!(
            Row::create(vec![Value::Null, "x".into()], schema),
            Err(RowError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_nested_struct() {
        let address = Arc::new(StructType::from_ddl("city string, zip int").unwrap());
        let schema = Arc::new(
            StructType::new(vec![
                StructField::new("name", DataType::String, true),
                StructField::new("address", DataType::Struct(Arc::clone(&address)), true),
            ])
            .unwrap(),
        );

        // the nested row was built against an equivalent but separate schema
        let other_address = Arc::new(StructType::from_ddl("town string, code bigint").unwrap());
        let nested = Row::create(vec!["Sayreville".into(), 8872i64.into()], other_address).unwrap();

        let row = Row::create(vec!["Bon".into(), nested.into()], schema).unwrap();
        let address_row = row.get_struct(1).unwrap();

        assert!(Arc::ptr_eq(&address, address_row.schema()));
        assert_eq!(8872, address_row.get_int(1).unwrap());
        assert_eq!("[Bon,[Sayreville,8872]]", row.to_string());
    }

    #[test]
    fn test_mk_string() {
        let row = jovi();

        assert_eq!(
            "Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6,0.45",
            row.mk_string(",")
        );
        assert_eq!(
            "Jovi,Bon,53,March 02 1962,4,true,3.0000000011E8,161.6,0.45",
            row.mk_string_with_options(
                "",
                ",",
                "",
                &FormatOptions::new().double_format(DoubleFormat::Jvm)
            )
        );
        assert_eq!(
            "[Jovi,Bon,53,March 02 1962,4,true,300000000.11,161.6,0.45]",
            row.to_string()
        );

        let mut values = jovi_values();
        values[6] = Value::Null;
        let row = Row::create(values, rockstars_schema()).unwrap();
        assert_eq!(
            "Jovi | Bon | 53 | March 02 1962 | 4 | true | null | 161.6 | 0.45",
            row.mk_string(" | ")
        );
    }

    #[test]
    fn test_copy_and_equality() {
        let row = jovi();
        let copy = row.copy();

        assert_eq!(row, copy);
        assert!(!std::ptr::eq(&row, &copy));
        assert!(Arc::ptr_eq(row.schema(), copy.schema()));
        assert_eq!(row.hash_code(), copy.hash_code());
    }

    #[test]
    fn test_equality_ignores_schema() {
        let renamed = Arc::new(
            StructType::new(
                rockstars_schema()
                    .fields()
                    .iter()
                    .map(|f| StructField::new(format!("c_{}", f.name), f.data_type.clone(), true))
                    .collect(),
            )
            .unwrap(),
        );

        let row = jovi();
        let other = Row::create(jovi_values(), renamed).unwrap();

        assert_eq!(row, other);
        assert_eq!(row.hash_code(), other.hash_code());

        let set: HashSet<Row> = [row, other].into_iter().collect();
        assert_eq!(1, set.len());
    }

    #[test]
    fn test_precision_sharp_edge() {
        let long_schema = Arc::new(StructType::from_ddl("n bigint").unwrap());
        let int_schema = Arc::new(StructType::from_ddl("n int").unwrap());

        let long_row = Row::create(vec![Value::from(53)], long_schema).unwrap();
        let int_row = Row::create(vec![Value::from(53)], int_schema).unwrap();

        assert_ne!(long_row, int_row);
    }

    #[test]
    fn test_named_construction() {
        let schema = rockstars_schema();
        let row = Row::try_from_named(
            [("surname", Value::from("Jagger")), ("age", Value::from(72))],
            Arc::clone(&schema),
        )
        .unwrap();

        assert_eq!("Jagger", row.get_string(0).unwrap());
        assert!(row.is_null_at(1).unwrap());
        assert!(row.any_null());

        let map = row.get_values_map(&["surname", "age"]).unwrap();
        assert_eq!(Some(&Value::Integer(72)), map.get("age"));

        assert!(matches!(
            Row::try_from_named([("height", Value::from(1.8))], schema),
            Err(RowError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_temporal_getters() {
        let schema = Arc::new(StructType::from_ddl("born date, seen timestamp, raw binary").unwrap());
        let born = NaiveDate::from_ymd_opt(1962, 3, 2).unwrap();
        let seen = Utc.with_ymd_and_hms(2015, 6, 1, 12, 30, 0).unwrap();

        let row = Row::create(vec![born.into(), seen.into(), vec![0xCAu8, 0xFE].into()], schema)
            .unwrap();

        assert_eq!(born, row.get_date(0).unwrap());
        assert_eq!(seen, row.get_timestamp(1).unwrap());
        assert_eq!(&[0xCAu8, 0xFE][..], row.get_binary(2).unwrap());
        assert_eq!("1962-03-02,2015-06-01 12:30:00.0,[CA FE]", row.mk_string(","));
    }

    #[test]
    fn test_rows_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Row>();

        let row = Arc::new(jovi());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let row = Arc::clone(&row);
                std::thread::spawn(move || row.get_int(2).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(53, handle.join().unwrap());
        }
    }
}
