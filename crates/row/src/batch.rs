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

//! Conversions between [Row] and Apache Arrow [RecordBatch]
//!
//! Results collected from a Spark cluster arrive as Arrow record batches.
//! [rows_from_batch] turns one batch into rows that all share a single
//! schema, and [rows_to_batch] goes the other way.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, BooleanArray, Date32Array, Decimal128Array,
    Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, StringArray,
    StructArray, TimestampMicrosecondArray,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{
    DataType as ArrowDataType, Date32Type, Decimal128Type, Field, Fields, Float32Type,
    Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::Value as JsonValue;

use crate::errors::RowError;
use crate::row::Row;
use crate::types::{DataType, StructField, StructType};
use crate::value::{Decimal, Value};

/// Days between 0001-01-01 and the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const UTC: &str = "UTC";

impl TryFrom<&ArrowDataType> for DataType {
    type Error = RowError;

    fn try_from(value: &ArrowDataType) -> Result<Self, Self::Error> {
        let data_type = match value {
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => DataType::String,
            ArrowDataType::Boolean => DataType::Boolean,
            ArrowDataType::Int8 => DataType::Byte,
            ArrowDataType::Int16 => DataType::Short,
            ArrowDataType::Int32 => DataType::Integer,
            ArrowDataType::Int64 => DataType::Long,
            ArrowDataType::Float32 => DataType::Float,
            ArrowDataType::Float64 => DataType::Double,
            ArrowDataType::Decimal128(precision, scale) => DataType::decimal(*precision, *scale)?,
            ArrowDataType::Date32 => DataType::Date,
            ArrowDataType::Timestamp(_, _) => DataType::Timestamp,
            ArrowDataType::Binary | ArrowDataType::LargeBinary => DataType::Binary,
            ArrowDataType::Struct(fields) => DataType::Struct(Arc::new(StructType::try_from(fields)?)),
            other => {
                return Err(RowError::Unsupported(format!(
                    "arrow type {} has no row representation",
                    other
                )))
            }
        };

        Ok(data_type)
    }
}

impl TryFrom<&Fields> for StructType {
    type Error = RowError;

    fn try_from(value: &Fields) -> Result<Self, Self::Error> {
        let fields = value
            .iter()
            .map(|field| {
                let metadata = field
                    .metadata()
                    .iter()
                    .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
                    .collect();

                Ok(StructField::new(
                    field.name().as_str(),
                    DataType::try_from(field.data_type())?,
                    field.is_nullable(),
                )
                .with_metadata(metadata))
            })
            .collect::<Result<Vec<_>, RowError>>()?;

        StructType::new(fields)
    }
}

impl TryFrom<&Schema> for StructType {
    type Error = RowError;

    fn try_from(value: &Schema) -> Result<Self, Self::Error> {
        StructType::try_from(value.fields())
    }
}

impl From<&DataType> for ArrowDataType {
    fn from(value: &DataType) -> Self {
        match value {
            DataType::Binary => ArrowDataType::Binary,
            DataType::Boolean => ArrowDataType::Boolean,
            DataType::Byte => ArrowDataType::Int8,
            DataType::Short => ArrowDataType::Int16,
            DataType::Integer => ArrowDataType::Int32,
            DataType::Long => ArrowDataType::Int64,
            DataType::Float => ArrowDataType::Float32,
            DataType::Double => ArrowDataType::Float64,
            DataType::Decimal { precision, scale } => ArrowDataType::Decimal128(*precision, *scale),
            DataType::String => ArrowDataType::Utf8,
            DataType::Date => ArrowDataType::Date32,
            DataType::Timestamp => ArrowDataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into())),
            DataType::Struct(val) => ArrowDataType::Struct(Fields::from(val.as_ref())),
        }
    }
}

impl From<&StructField> for Field {
    fn from(value: &StructField) -> Self {
        let metadata: HashMap<String, String> = value
            .metadata
            .iter()
            .map(|(k, v)| match v {
                JsonValue::String(s) => (k.clone(), s.clone()),
                other => (k.clone(), other.to_string()),
            })
            .collect();

        Field::new(
            value.name.as_str(),
            ArrowDataType::from(&value.data_type),
            value.nullable,
        )
        .with_metadata(metadata)
    }
}

impl From<&StructType> for Fields {
    fn from(value: &StructType) -> Self {
        value.fields().iter().map(Field::from).collect::<Vec<_>>().into()
    }
}

impl From<&StructType> for Schema {
    fn from(value: &StructType) -> Self {
        Schema::new(Fields::from(value))
    }
}

/// One [Row] per record of `batch`, all sharing one schema
pub fn rows_from_batch(batch: &RecordBatch) -> Result<Vec<Row>, RowError> {
    let schema = Arc::new(StructType::try_from(batch.schema().as_ref())?);

    tracing::debug!(
        num_rows = batch.num_rows(),
        num_columns = batch.num_columns(),
        "converting record batch to rows"
    );

    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(column, field)| column_values(column.as_ref(), &field.data_type))
        .collect::<Result<Vec<_>, RowError>>()?;

    let rows = assemble_rows(columns, batch.num_rows(), &schema, |_| true)?;
    Ok(rows.into_iter().flatten().collect())
}

/// Transpose column-major values into rows. Positions where `is_valid` is
/// false produce `None` and their values are dropped.
fn assemble_rows(
    columns: Vec<Vec<Value>>,
    num_rows: usize,
    schema: &Arc<StructType>,
    is_valid: impl Fn(usize) -> bool,
) -> Result<Vec<Option<Row>>, RowError> {
    let mut columns: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();

    (0..num_rows)
        .map(|idx| {
            let values: Vec<Value> = columns
                .iter_mut()
                .map(|column| column.next().unwrap_or(Value::Null))
                .collect();

            if is_valid(idx) {
                Row::create(values, Arc::clone(schema)).map(Some)
            } else {
                Ok(None)
            }
        })
        .collect()
}

fn downcast_error(array: &dyn Array, expected: &DataType) -> RowError {
    RowError::Unsupported(format!(
        "arrow array of type {} cannot be read as {}",
        array.data_type(),
        expected
    ))
}

fn collect_values<T>(iter: impl Iterator<Item = Option<T>>, f: impl Fn(T) -> Value) -> Vec<Value> {
    iter.map(|v| v.map(&f).unwrap_or(Value::Null)).collect()
}

fn timestamp_value(value: i64, unit: &TimeUnit) -> Result<Value, RowError> {
    let per_second: i64 = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    let secs = value.div_euclid(per_second);
    let nanos = (value.rem_euclid(per_second) * (1_000_000_000 / per_second)) as u32;

    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(Value::Timestamp)
        .ok_or_else(|| RowError::TypeMismatch(format!("timestamp {} is out of range", value)))
}

/// Every value of `array`, read as `data_type`
fn column_values(array: &dyn Array, data_type: &DataType) -> Result<Vec<Value>, RowError> {
    let values = match data_type {
        DataType::String => match array.data_type() {
            ArrowDataType::LargeUtf8 => array
                .as_string_opt::<i64>()
                .map(|a| collect_values(a.iter(), |s| Value::String(s.to_string()))),
            _ => array
                .as_string_opt::<i32>()
                .map(|a| collect_values(a.iter(), |s| Value::String(s.to_string()))),
        },
        DataType::Binary => match array.data_type() {
            ArrowDataType::LargeBinary => array
                .as_binary_opt::<i64>()
                .map(|a| collect_values(a.iter(), |b| Value::Binary(b.to_vec()))),
            _ => array
                .as_binary_opt::<i32>()
                .map(|a| collect_values(a.iter(), |b| Value::Binary(b.to_vec()))),
        },
        DataType::Boolean => array
            .as_boolean_opt()
            .map(|a| collect_values(a.iter(), Value::Boolean)),
        DataType::Byte => array
            .as_primitive_opt::<Int8Type>()
            .map(|a| collect_values(a.iter(), Value::Byte)),
        DataType::Short => array
            .as_primitive_opt::<Int16Type>()
            .map(|a| collect_values(a.iter(), Value::Short)),
        DataType::Integer => array
            .as_primitive_opt::<Int32Type>()
            .map(|a| collect_values(a.iter(), Value::Integer)),
        DataType::Long => array
            .as_primitive_opt::<Int64Type>()
            .map(|a| collect_values(a.iter(), Value::Long)),
        DataType::Float => array
            .as_primitive_opt::<Float32Type>()
            .map(|a| collect_values(a.iter(), Value::Float)),
        DataType::Double => array
            .as_primitive_opt::<Float64Type>()
            .map(|a| collect_values(a.iter(), Value::Double)),
        DataType::Decimal { precision, scale } => match array.as_primitive_opt::<Decimal128Type>() {
            Some(a) => Some(
                a.iter()
                    .map(|v| match v {
                        Some(v) => Decimal::try_new(v, *precision, *scale).map(Value::Decimal),
                        None => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<_>, RowError>>()?,
            ),
            None => None,
        },
        DataType::Date => match array.as_primitive_opt::<Date32Type>() {
            Some(a) => Some(
                a.iter()
                    .map(|v| match v {
                        Some(days) => days
                            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                            .and_then(NaiveDate::from_num_days_from_ce_opt)
                            .map(Value::Date)
                            .ok_or_else(|| {
                                RowError::TypeMismatch(format!("date {} is out of range", days))
                            }),
                        None => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<_>, RowError>>()?,
            ),
            None => None,
        },
        DataType::Timestamp => match array.data_type() {
            ArrowDataType::Timestamp(unit, _) => {
                let raw: Option<Vec<Option<i64>>> = match unit {
                    TimeUnit::Second => array
                        .as_primitive_opt::<TimestampSecondType>()
                        .map(|a| a.iter().collect()),
                    TimeUnit::Millisecond => array
                        .as_primitive_opt::<TimestampMillisecondType>()
                        .map(|a| a.iter().collect()),
                    TimeUnit::Microsecond => array
                        .as_primitive_opt::<TimestampMicrosecondType>()
                        .map(|a| a.iter().collect()),
                    TimeUnit::Nanosecond => array
                        .as_primitive_opt::<TimestampNanosecondType>()
                        .map(|a| a.iter().collect()),
                };

                match raw {
                    Some(raw) => Some(
                        raw.into_iter()
                            .map(|v| match v {
                                Some(v) => timestamp_value(v, unit),
                                None => Ok(Value::Null),
                            })
                            .collect::<Result<Vec<_>, RowError>>()?,
                    ),
                    None => None,
                }
            }
            _ => None,
        },
        DataType::Struct(schema) => match array.as_struct_opt() {
            Some(a) => {
                let children = a
                    .columns()
                    .iter()
                    .zip(schema.fields())
                    .map(|(child, field)| column_values(child.as_ref(), &field.data_type))
                    .collect::<Result<Vec<_>, RowError>>()?;

                let rows = assemble_rows(children, a.len(), schema, |idx| a.is_valid(idx))?;
                Some(
                    rows.into_iter()
                        .map(|row| row.map(Value::Struct).unwrap_or(Value::Null))
                        .collect(),
                )
            }
            None => None,
        },
    };

    values.ok_or_else(|| downcast_error(array, data_type))
}

/// Build a [RecordBatch] holding `rows`, laid out by `schema`
pub fn rows_to_batch(rows: &[Row], schema: &Arc<StructType>) -> Result<RecordBatch, RowError> {
    let arrow_schema = Arc::new(Schema::from(schema.as_ref()));

    let columns = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let values = rows
                .iter()
                .map(|row| row.get(idx))
                .collect::<Result<Vec<_>, RowError>>()?;
            build_array(&field.data_type, &values)
        })
        .collect::<Result<Vec<_>, RowError>>()?;

    tracing::debug!(
        num_rows = rows.len(),
        num_columns = columns.len(),
        "converted rows to record batch"
    );

    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    Ok(RecordBatch::try_new_with_options(
        arrow_schema,
        columns,
        &options,
    )?)
}

macro_rules! typed_values {
    ($values:expr, $data_type:expr, $variant:ident, |$v:ident| $map:expr) => {
        $values
            .iter()
            .map(|value| match value {
                Value::Null => Ok(None),
                Value::$variant($v) => Ok(Some($map)),
                other => Err(RowError::TypeMismatch(format!(
                    "value of kind {} cannot be stored in a {} column",
                    other.kind(),
                    $data_type
                ))),
            })
            .collect::<Result<Vec<_>, RowError>>()?
    };
}

static NULL: Value = Value::Null;

fn build_array(data_type: &DataType, values: &[&Value]) -> Result<ArrayRef, RowError> {
    let array: ArrayRef = match data_type {
        DataType::String => Arc::new(StringArray::from_iter(typed_values!(
            values, data_type, String, |v| v.as_str()
        ))),
        DataType::Binary => Arc::new(BinaryArray::from_iter(typed_values!(
            values, data_type, Binary, |v| v.as_slice()
        ))),
        DataType::Boolean => Arc::new(BooleanArray::from(typed_values!(
            values, data_type, Boolean, |v| *v
        ))),
        DataType::Byte => Arc::new(Int8Array::from(typed_values!(
            values, data_type, Byte, |v| *v
        ))),
        DataType::Short => Arc::new(Int16Array::from(typed_values!(
            values, data_type, Short, |v| *v
        ))),
        DataType::Integer => Arc::new(Int32Array::from(typed_values!(
            values, data_type, Integer, |v| *v
        ))),
        DataType::Long => Arc::new(Int64Array::from(typed_values!(
            values, data_type, Long, |v| *v
        ))),
        DataType::Float => Arc::new(Float32Array::from(typed_values!(
            values, data_type, Float, |v| *v
        ))),
        DataType::Double => Arc::new(Float64Array::from(typed_values!(
            values, data_type, Double, |v| *v
        ))),
        DataType::Decimal { precision, scale } => {
            let decimals = typed_values!(values, data_type, Decimal, |v| *v);
            let unscaled = decimals
                .into_iter()
                .map(|d| match d {
                    Some(d) => d
                        .rescale(*precision, *scale)
                        .map(|d| Some(d.value()))
                        .ok_or_else(|| {
                            RowError::TypeMismatch(format!(
                                "decimal {} does not fit {}",
                                d, data_type
                            ))
                        }),
                    None => Ok(None),
                })
                .collect::<Result<Vec<_>, RowError>>()?;

            Arc::new(Decimal128Array::from(unscaled).with_precision_and_scale(*precision, *scale)?)
        }
        DataType::Date => Arc::new(Date32Array::from(typed_values!(
            values, data_type, Date, |v| v.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
        ))),
        DataType::Timestamp => Arc::new(
            TimestampMicrosecondArray::from(typed_values!(
                values, data_type, Timestamp, |v| v.timestamp_micros()
            ))
            .with_timezone(UTC),
        ),
        DataType::Struct(schema) => {
            if schema.is_empty() {
                return Err(RowError::Unsupported(
                    "struct columns without fields".to_string(),
                ));
            }

            let nested = typed_values!(values, data_type, Struct, |v| v);
            let children = schema
                .fields()
                .iter()
                .enumerate()
                .map(|(idx, field)| {
                    let child_values = nested
                        .iter()
                        .map(|row| match row {
                            Some(row) => row.get(idx),
                            None => Ok(&NULL),
                        })
                        .collect::<Result<Vec<_>, RowError>>()?;
                    build_array(&field.data_type, &child_values)
                })
                .collect::<Result<Vec<_>, RowError>>()?;

            let validity = NullBuffer::from(nested.iter().map(Option::is_some).collect::<Vec<_>>());
            Arc::new(StructArray::try_new(
                Fields::from(schema.as_ref()),
                children,
                Some(validity),
            )?)
        }
    };

    Ok(array)
}
