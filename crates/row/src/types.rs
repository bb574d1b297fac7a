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

//! Spark schema types: [DataType], [StructField] and [StructType]

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{validate_decimal_precision_and_scale, Decimal128Type, DecimalType};
use serde_json::{json, Map, Value as JsonValue};

use crate::errors::RowError;

/// Largest precision a [DataType::Decimal] can carry
pub const MAX_DECIMAL_PRECISION: u8 = Decimal128Type::MAX_PRECISION;

/// Represents basic methods for a [SparkDataType]
pub trait SparkDataType {
    /// Name used inside Spark's schema JSON, e.g. `integer` or `decimal(10,0)`
    fn type_name(&self) -> String;

    /// Compact SQL-like form, e.g. `int` or `struct<a:int,b:string>`
    fn simple_string(&self) -> String;

    /// JSON representation of the object
    fn json_value(&self) -> JsonValue;

    fn json(&self) -> String {
        self.json_value().to_string()
    }
}

/// A set of DataTypes which represent Spark DataTypes.
///
/// These DataTypes variants are used to construct a schema representation
///
/// # Example:
///
/// ```
/// let schema = StructType::new(vec![
///     StructField::new("name", DataType::String, false),
///     StructField::new("age", DataType::Short, true),
/// ])?;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum DataType {
    /// BinaryType
    Binary,
    /// BooleanType
    Boolean,
    /// ByteType
    Byte,
    /// ShortType
    Short,
    /// IntegerType
    Integer,
    /// LongType
    Long,
    /// FloatType
    Float,
    /// DoubleType
    Double,
    /// DecimalType with precision and scale
    Decimal { precision: u8, scale: i8 },
    /// StringType
    String,
    /// DateType
    Date,
    /// TimestampType
    Timestamp,
    /// StructType
    Struct(Arc<StructType>),
}

impl DataType {
    /// Spark's `DecimalType()` default of `decimal(10,0)`
    pub const DEFAULT_DECIMAL: DataType = DataType::Decimal {
        precision: 10,
        scale: 0,
    };

    /// Create a validated [DataType::Decimal]
    pub fn decimal(precision: u8, scale: i8) -> Result<DataType, RowError> {
        if scale < 0 {
            return Err(RowError::InvalidSchema(format!(
                "decimal scale {} must not be negative",
                scale
            )));
        }
        validate_decimal_precision_and_scale::<Decimal128Type>(precision, scale)
            .map_err(|err| RowError::InvalidSchema(err.to_string()))?;
        Ok(DataType::Decimal { precision, scale })
    }

    /// Parse a type name as written in DDL strings or schema JSON.
    ///
    /// Accepts both the simple names (`int`, `bigint`) and the JSON names
    /// (`integer`, `long`), `decimal(p,s)` and `struct<name:type,...>`.
    pub fn from_str_name(value: &str) -> Result<DataType, RowError> {
        let value = value.trim();
        let lower = value.to_lowercase();

        let data_type = match lower.as_str() {
            "binary" => DataType::Binary,
            "bool" | "boolean" => DataType::Boolean,
            "tinyint" | "byte" => DataType::Byte,
            "smallint" | "short" => DataType::Short,
            "int" | "integer" => DataType::Integer,
            "bigint" | "long" => DataType::Long,
            "float" | "real" => DataType::Float,
            "double" => DataType::Double,
            "str" | "string" => DataType::String,
            "date" => DataType::Date,
            "timestamp" => DataType::Timestamp,
            "dec" | "decimal" | "numeric" => DataType::DEFAULT_DECIMAL,
            _ if lower.starts_with("struct<") && lower.ends_with('>') => {
                let inner = &value["struct<".len()..value.len() - 1];
                DataType::Struct(Arc::new(parse_struct_body(inner)?))
            }
            _ if lower.starts_with("decimal(") && lower.ends_with(')') => {
                parse_decimal_args(&lower["decimal(".len()..lower.len() - 1])?
            }
            _ => {
                return Err(RowError::InvalidSchema(format!(
                    "unknown data type '{}'",
                    value
                )))
            }
        };

        Ok(data_type)
    }
}

fn parse_decimal_args(args: &str) -> Result<DataType, RowError> {
    let invalid = || RowError::InvalidSchema(format!("invalid decimal arguments '{}'", args));

    let mut parts = args.split(',').map(str::trim);
    let precision = parts
        .next()
        .and_then(|p| p.parse::<u8>().ok())
        .ok_or_else(invalid)?;
    let scale = match parts.next() {
        Some(s) => s.parse::<i8>().map_err(|_| invalid())?,
        None => 0,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }

    DataType::decimal(precision, scale)
}

fn parse_struct_body(body: &str) -> Result<StructType, RowError> {
    let fields = split_top_level(body)
        .into_iter()
        .map(|entry| {
            let (name, data_type) = entry.split_once(':').ok_or_else(|| {
                RowError::InvalidSchema(format!("struct field '{}' is missing a type", entry))
            })?;
            Ok(StructField::new(
                unquote(name.trim()),
                DataType::from_str_name(data_type)?,
                true,
            ))
        })
        .collect::<Result<Vec<_>, RowError>>()?;

    StructType::new(fields)
}

/// Split on commas that are not nested inside `<>` or `()`
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(input[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn unquote(name: &str) -> &str {
    name.strip_prefix('`')
        .and_then(|n| n.strip_suffix('`'))
        .unwrap_or(name)
}

impl SparkDataType for DataType {
    fn type_name(&self) -> String {
        match self {
            Self::Binary => String::from("binary"),
            Self::Boolean => String::from("boolean"),
            Self::Byte => String::from("byte"),
            Self::Short => String::from("short"),
            Self::Integer => String::from("integer"),
            Self::Long => String::from("long"),
            Self::Float => String::from("float"),
            Self::Double => String::from("double"),
            Self::Decimal { precision, scale } => format!("decimal({},{})", precision, scale),
            Self::String => String::from("string"),
            Self::Date => String::from("date"),
            Self::Timestamp => String::from("timestamp"),
            Self::Struct(_) => String::from("struct"),
        }
    }

    fn simple_string(&self) -> String {
        match self {
            Self::Byte => String::from("tinyint"),
            Self::Short => String::from("smallint"),
            Self::Integer => String::from("int"),
            Self::Long => String::from("bigint"),
            Self::Struct(val) => val.simple_string(),
            other => other.type_name(),
        }
    }

    fn json_value(&self) -> JsonValue {
        match self {
            Self::Struct(val) => val.json_value(),
            other => JsonValue::String(other.type_name()),
        }
    }
}

/// Renders the Spark `toString` form, e.g. `IntegerType` or `DecimalType(10,0)`
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "BinaryType"),
            Self::Boolean => write!(f, "BooleanType"),
            Self::Byte => write!(f, "ByteType"),
            Self::Short => write!(f, "ShortType"),
            Self::Integer => write!(f, "IntegerType"),
            Self::Long => write!(f, "LongType"),
            Self::Float => write!(f, "FloatType"),
            Self::Double => write!(f, "DoubleType"),
            Self::Decimal { precision, scale } => write!(f, "DecimalType({},{})", precision, scale),
            Self::String => write!(f, "StringType"),
            Self::Date => write!(f, "DateType"),
            Self::Timestamp => write!(f, "TimestampType"),
            Self::Struct(val) => write!(f, "{}", val),
        }
    }
}

/// A Field in a [StructType]
#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub metadata: Map<String, JsonValue>,
}

impl StructField {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        StructField {
            name: name.into(),
            data_type,
            nullable,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, JsonValue>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Introspection view of the field:
    /// `{ "name", "dataType", "nullable", "metadata" }` where `dataType`
    /// is the `toString` rendering of the type.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "name": self.name,
            "dataType": self.data_type.to_string(),
            "nullable": self.nullable,
            "metadata": self.metadata,
        })
    }

    fn json_value(&self) -> JsonValue {
        json!({
            "name": self.name,
            "type": self.data_type.json_value(),
            "nullable": self.nullable,
            "metadata": self.metadata,
        })
    }
}

impl fmt::Display for StructField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StructField({},{},{})",
            self.name, self.data_type, self.nullable
        )
    }
}

/// Representation of a Spark StructType
///
/// An ordered set of uniquely named [StructField]. The position of a field
/// is the index every [crate::Row] built against this schema uses for it.
///
/// # Example:
///
/// ```
/// let schema = StructType::new(vec![
///     StructField::new("surname", DataType::String, true),
///     StructField::new("age", DataType::Integer, true),
/// ])?;
///
/// assert_eq!(1, schema.field_index("age")?);
/// ```
///
/// Complex types are also supported. The example below nests a struct
/// inside a field:
///
/// ```
/// let address = StructType::from_ddl("street string, zip int")?;
///
/// let schema = StructType::empty()
///     .add(StructField::new("name", DataType::String, false))?
///     .add(StructField::new("address", DataType::Struct(Arc::new(address)), true))?;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructType {
    fields: Vec<StructField>,
}

impl StructType {
    /// Create an empty StructType
    pub fn empty() -> Self {
        StructType { fields: vec![] }
    }

    /// Create a new StructType from a vector of [StructField]
    ///
    /// Field names must be non-empty and unique.
    pub fn new(fields: Vec<StructField>) -> Result<Self, RowError> {
        fields
            .into_iter()
            .try_fold(StructType::empty(), |schema, field| schema.add(field))
    }

    /// Append a new field onto the existing fields
    pub fn add(mut self, field: StructField) -> Result<Self, RowError> {
        if field.name.is_empty() {
            return Err(RowError::InvalidSchema(
                "field names must not be empty".to_string(),
            ));
        }
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(RowError::InvalidSchema(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }

        self.fields.push(field);
        Ok(self)
    }

    /// Parse a DDL column list such as `name string, age int NOT NULL`
    pub fn from_ddl(ddl: &str) -> Result<Self, RowError> {
        let fields = split_top_level(ddl)
            .into_iter()
            .map(parse_ddl_column)
            .collect::<Result<Vec<_>, RowError>>()?;

        StructType::new(fields)
    }

    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn len(&self) -> usize {
        self.field_count()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field called `name`. The match is exact and case-sensitive.
    pub fn field_index(&self, name: &str) -> Result<usize, RowError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| RowError::FieldNotFound(name.to_string()))
    }

    pub fn field(&self, index: usize) -> Result<&StructField, RowError> {
        self.fields.get(index).ok_or(RowError::IndexOutOfRange {
            index,
            length: self.fields.len(),
        })
    }
}

fn parse_ddl_column(column: &str) -> Result<StructField, RowError> {
    let (name, rest) = if let Some(quoted) = column.strip_prefix('`') {
        let end = quoted.find('`').ok_or_else(|| {
            RowError::InvalidSchema(format!("unterminated quoted name in '{}'", column))
        })?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        column
            .split_once(char::is_whitespace)
            .ok_or_else(|| {
                RowError::InvalidSchema(format!("column '{}' is missing a type", column))
            })?
    };

    let rest = rest.trim();
    let (type_str, nullable) = match rest.len().checked_sub(" not null".len()) {
        Some(cut) if rest.is_char_boundary(cut) && rest[cut..].eq_ignore_ascii_case(" not null") => {
            (&rest[..cut], false)
        }
        _ => (rest, true),
    };

    Ok(StructField::new(
        name,
        DataType::from_str_name(type_str)?,
        nullable,
    ))
}

impl SparkDataType for StructType {
    fn type_name(&self) -> String {
        String::from("struct")
    }

    fn simple_string(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{}:{}", f.name, f.data_type.simple_string()))
            .collect();

        format!("struct<{}>", fields.join(","))
    }

    fn json_value(&self) -> JsonValue {
        let fields: Vec<JsonValue> = self.fields.iter().map(|f| f.json_value()).collect();

        json!({
            "type": "struct",
            "fields": fields,
        })
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|f| f.to_string()).collect();
        write!(f, "StructType({})", fields.join(","))
    }
}
