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

//! Defines a [RowError] for representing failures when building or reading rows.
//! Every variant is a local validation failure raised at the offending call.
use arrow::error::ArrowError;
use thiserror::Error;

/// Different `Row` and `Schema` error types
#[derive(Error, Debug)]
pub enum RowError {
    #[error("Arity Mismatch: expected {expected} values but got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Type Mismatch: {0}")]
    TypeMismatch(String),

    #[error("Field Not Found: {0}")]
    FieldNotFound(String),

    #[error("Index Out of Range: index {index} is outside of [0, {length})")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("Null Value: value at index {0} is null")]
    NullValue(usize),

    #[error("Invalid Schema: {0}")]
    InvalidSchema(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Apache Arrow Error: {0}")]
    ArrowError(#[from] ArrowError),

    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RowError {
    pub(crate) fn type_mismatch(field: &str, expected: impl std::fmt::Display, found: &str) -> Self {
        RowError::TypeMismatch(format!(
            "field '{}' is declared as {} but got {}",
            field, expected, found
        ))
    }
}
