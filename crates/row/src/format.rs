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

//! Text rendering of row values, used by [crate::Row::mk_string] and `Display`.
//!
//! Doubles and floats default to [DoubleFormat::Shortest], the shortest text
//! that parses back to the same number, never in scientific notation. Set
//! [DoubleFormat::Jvm] to reproduce `java.lang.Double.toString` output such
//! as `3.0000000011E8` when text must match what a JVM prints.

use std::env;
use std::fmt::{self, Display, LowerExp, Write};
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};

use crate::errors::RowError;
use crate::value::Value;

/// Environment variable read by [FormatOptions::from_env]
pub const DOUBLE_FORMAT_ENV: &str = "SPARK_ROW_DOUBLE_FORMAT";

/// How `Float` and `Double` values turn into text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DoubleFormat {
    /// `300000000.11`, `53`, `0.0001`
    #[default]
    Shortest,
    /// `3.0000000011E8`, `53.0`, `1.0E-4`
    Jvm,
}

impl FromStr for DoubleFormat {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shortest" | "plain" => Ok(DoubleFormat::Shortest),
            "jvm" | "java" => Ok(DoubleFormat::Jvm),
            other => Err(RowError::Unsupported(format!(
                "unknown double format '{}', expected 'shortest' or 'jvm'",
                other
            ))),
        }
    }
}

/// Options for rendering values as text.
///
/// # Example
/// ```rust
/// let options = FormatOptions::new()
///     .double_format(DoubleFormat::Jvm)
///     .null_text("NULL");
///
/// row.mk_string_with_options("", ",", "", &options);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub double_format: DoubleFormat,
    pub null_text: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            double_format: DoubleFormat::default(),
            null_text: "null".to_string(),
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        FormatOptions::default()
    }

    /// Defaults, with the double format taken from `SPARK_ROW_DOUBLE_FORMAT` when set
    pub fn from_env() -> Result<Self, RowError> {
        let options = FormatOptions::default();

        match env::var(DOUBLE_FORMAT_ENV) {
            Ok(val) => {
                let double_format = val.parse()?;
                tracing::debug!(?double_format, "double format taken from environment");
                Ok(options.double_format(double_format))
            }
            Err(_) => Ok(options),
        }
    }

    pub fn double_format(mut self, val: DoubleFormat) -> Self {
        self.double_format = val;
        self
    }

    pub fn null_text(mut self, val: &str) -> Self {
        self.null_text = val.to_string();
        self
    }
}

trait FloatText: Display + LowerExp + Copy {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_zero(self) -> bool;
    fn is_negative(self) -> bool;
    fn is_plain_jvm_range(self) -> bool;
}

macro_rules! impl_float_text {
    ($type:ty) => {
        impl FloatText for $type {
            fn is_nan(self) -> bool {
                <$type>::is_nan(self)
            }

            fn is_infinite(self) -> bool {
                <$type>::is_infinite(self)
            }

            fn is_zero(self) -> bool {
                self == 0.0
            }

            fn is_negative(self) -> bool {
                self.is_sign_negative()
            }

            fn is_plain_jvm_range(self) -> bool {
                let abs = self.abs();
                (1e-3..1e7).contains(&abs)
            }
        }
    };
}

impl_float_text!(f32);
impl_float_text!(f64);

fn write_float<T: FloatText>(out: &mut String, v: T, format: DoubleFormat) -> fmt::Result {
    if v.is_nan() {
        return out.write_str("NaN");
    }
    if v.is_infinite() {
        return out.write_str(if v.is_negative() { "-Infinity" } else { "Infinity" });
    }

    match format {
        DoubleFormat::Shortest => write!(out, "{}", v),
        DoubleFormat::Jvm if v.is_zero() => {
            out.write_str(if v.is_negative() { "-0.0" } else { "0.0" })
        }
        DoubleFormat::Jvm if v.is_plain_jvm_range() => {
            let text = v.to_string();
            out.write_str(&text)?;
            if !text.contains('.') {
                out.write_str(".0")?;
            }
            Ok(())
        }
        DoubleFormat::Jvm => {
            let text = format!("{:e}", v);
            let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
            out.write_str(mantissa)?;
            if !mantissa.contains('.') {
                out.write_str(".0")?;
            }
            write!(out, "E{}", exponent)
        }
    }
}

fn write_timestamp(out: &mut String, ts: &DateTime<Utc>) -> fmt::Result {
    write!(out, "{}", ts.format("%Y-%m-%d %H:%M:%S"))?;

    let nanos = ts.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        return out.write_str(".0");
    }
    let fraction = format!("{:09}", nanos);
    write!(out, ".{}", fraction.trim_end_matches('0'))
}

/// Append the text form of `value` onto `out`
pub(crate) fn write_value(out: &mut String, value: &Value, options: &FormatOptions) -> fmt::Result {
    match value {
        Value::Null => out.write_str(&options.null_text),
        Value::String(v) => out.write_str(v),
        Value::Boolean(v) => write!(out, "{}", v),
        Value::Byte(v) => write!(out, "{}", v),
        Value::Short(v) => write!(out, "{}", v),
        Value::Integer(v) => write!(out, "{}", v),
        Value::Long(v) => write!(out, "{}", v),
        Value::Float(v) => write_float(out, *v, options.double_format),
        Value::Double(v) => write_float(out, *v, options.double_format),
        Value::Decimal(v) => write!(out, "{}", v),
        Value::Date(v) => write!(out, "{}", v.format("%Y-%m-%d")),
        Value::Timestamp(v) => write_timestamp(out, v),
        Value::Binary(v) => {
            out.write_char('[')?;
            for (idx, byte) in v.iter().enumerate() {
                if idx > 0 {
                    out.write_char(' ')?;
                }
                write!(out, "{:02X}", byte)?;
            }
            out.write_char(']')
        }
        Value::Struct(row) => write_values(out, row.values(), "[", ",", "]", options),
    }
}

/// Join the text form of every value with `sep`, wrapped in `start` and `end`
pub(crate) fn write_values(
    out: &mut String,
    values: &[Value],
    start: &str,
    sep: &str,
    end: &str,
    options: &FormatOptions,
) -> fmt::Result {
    out.write_str(start)?;
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.write_str(sep)?;
        }
        write_value(out, value, options)?;
    }
    out.write_str(end)
}
