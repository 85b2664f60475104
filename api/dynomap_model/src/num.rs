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

use std::fmt::{Display, Formatter};

use crate::ValueError;

/// The runtime representation of a numeric attribute. The wire format carries
/// numbers as decimal text; this type keeps the source representation so that
/// integers round trip exactly and floats do not pick up rounding artifacts.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// The decimal text written into a number attribute. Fails for `NaN` and
    /// the infinities, which have no decimal representation.
    pub fn to_decimal(&self) -> Result<String, ValueError> {
        match self {
            Number::Int(n) => Ok(n.to_string()),
            Number::UInt(n) => Ok(n.to_string()),
            Number::Float(x) if x.is_finite() => Ok(x.to_string()),
            Number::Float(x) => Err(ValueError::NonFiniteNumber(*x)),
        }
    }

    /// Parse the decimal text of a number attribute. Integral values are kept
    /// exact; anything else must parse as a finite float.
    pub fn from_decimal(text: &str) -> Result<Number, ValueError> {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Number::Int(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Number::UInt(n));
        }
        match text.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Number::Float(x)),
            _ => Err(ValueError::InvalidDecimal {
                text: text.to_string(),
            }),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::UInt(n) => *n as f64,
            Number::Float(x) => *x,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::UInt(n) => i64::try_from(*n).ok(),
            Number::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int(n) => u64::try_from(*n).ok(),
            Number::UInt(n) => Some(*n),
            Number::Float(_) => None,
        }
    }
}

/// Numbers compare by value, not by representation, so a value parsed back
/// from the wire is equal to the value it was encoded from.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Int(a), Number::UInt(b)) | (Number::UInt(b), Number::Int(a)) => {
                u64::try_from(*a).map(|a| a == *b).unwrap_or(false)
            }
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::UInt(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::UInt(n)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::UInt(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}
