// Copyright 2019-2024 Dynomap developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use dynomap_model::ValueError;
use thiserror::Error;

/// Failure modes of the mapping engine. All mapping errors are synchronous and
/// non-retryable; a failing attribute aborts the encoding or decoding of the
/// whole record rather than producing a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// The wire format forbids empty sets and lists as attribute values.
    #[error("empty collections cannot be written as attribute values")]
    EmptyCollection,
    /// Absence is only expressible by omission inside a map, never at the top
    /// level of an attribute.
    #[error("a value is required at the top level but none was provided")]
    RequiredValue,
    /// A scalar failed to move between its runtime and wire representations.
    #[error(transparent)]
    Value(#[from] ValueError),
    /// An auto generated property carried an explicit value.
    #[error("property '{property}' is auto generated and must not have a value assigned")]
    PredefinedAutogeneratedValue { property: String },
    /// A value shape that has no attribute value representation.
    #[error("a value of kind {kind} cannot be mapped to an attribute value")]
    UnsupportedShape { kind: &'static str },
    /// A model was used for mapping before its schema was registered.
    #[error("no schema is registered for model '{model}'")]
    UnregisteredModel { model: String },
    /// Two schemas were registered under the same model name.
    #[error("a schema for model '{model}' is already registered")]
    DuplicateModel { model: String },
    #[error("table name '{name}' is invalid; use 3 to 255 characters from a-z A-Z 0-9 - _ .")]
    InvalidTableName { name: String },
    /// A decoded value did not have the shape a typed reconstruction expected.
    #[error("expected {expected} but found a value of kind {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// A typed reconstruction found no value for a required field.
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },
}
