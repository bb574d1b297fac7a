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

//! Schema-typed Apache Spark rows for Rust
//!
//! A [Row] is an immutable, fixed-length tuple of [Value] bound to a shared
//! [StructType]. Values are checked against their fields when the row is
//! created, and read back through positional, name-based and typed getters.
//!
//! # Quickstart
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use spark_row_rs::{DataType, Row, StructField, StructType, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Arc::new(StructType::new(vec![
//!         StructField::new("surname", DataType::String, true),
//!         StructField::new("forename", DataType::String, true),
//!         StructField::new("age", DataType::Integer, true),
//!         StructField::new("networth", DataType::Double, true),
//!     ])?);
//!
//!     let row = Row::create(
//!         vec!["Jovi".into(), "Bon".into(), Value::from(53), Value::Null],
//!         schema,
//!     )?;
//!
//!     assert_eq!(53, row.get_int(2)?);
//!     assert_eq!(1, row.field_index("forename")?);
//!     assert!(row.is_null_at(3)?);
//!     assert_eq!("Jovi,Bon,53,null", row.mk_string(","));
//!
//!     Ok(())
//! }
//! ```
//!
//! Rows collected from a cluster as Arrow record batches can be converted
//! with [batch::rows_from_batch].

pub mod batch;
pub mod errors;
pub mod format;
pub mod row;
pub mod types;
pub mod value;

pub use errors::RowError;
pub use format::{DoubleFormat, FormatOptions};
pub use row::Row;
pub use types::{DataType, SparkDataType, StructField, StructType};
pub use value::{Decimal, Value};
