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

use thiserror::Error;

/// Errors produced when scalar values cannot be moved between their runtime
/// representation and the wire level text forms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Number attributes carry decimal text so there is no representation for
    /// `NaN` or the infinities.
    #[error("the number {0} is not finite and cannot be written as a decimal attribute")]
    NonFiniteNumber(f64),
    /// The decimal text of a number attribute could not be parsed back into a number.
    #[error("'{text}' is not a valid decimal number")]
    InvalidDecimal { text: String },
    /// A string did not hold a well formed timestamp where one was required.
    #[error("'{text}' is not a valid timestamp")]
    InvalidTimestamp { text: String },
    /// Base64 encoded binary data could not be decoded.
    #[error("invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
