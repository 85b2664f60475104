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

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::{Blob, Number, ValueError};

/// One encoded record: a mapping from property name to attribute value. Keys
/// are unique and insertion order carries no meaning.
pub type AttributeMap = HashMap<String, AttrValue>;

/// The wire level representation of a single attribute, mirroring the DynamoDB
/// attribute value JSON shape. Exactly one variant is populated; set variants
/// are non-empty and homogeneous in element kind (the encoder enforces both).
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// `{S: string}`
    String(String),
    /// `{N: decimal-string}`
    Number(String),
    /// `{BOOL: bool}`
    Boolean(bool),
    /// `{NULL: true}`
    Null,
    /// `{B: bytes}`
    Binary(Blob),
    /// `{SS: [string, ...]}`
    StringSet(Vec<String>),
    /// `{NS: [decimal-string, ...]}`
    NumberSet(Vec<String>),
    /// `{BS: [bytes, ...]}`
    BinarySet(Vec<Blob>),
    /// `{L: [value, ...]}`
    List(Vec<AttrValue>),
    /// `{M: {string: value, ...}}`
    Map(AttributeMap),
}

/// The kinds of the variants of [`AttrValue`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Binary,
    StringSet,
    NumberSet,
    BinarySet,
    List,
    Map,
}

impl AttrValue {
    /// Create a string attribute from anything string-like.
    pub fn text<T: Into<String>>(text: T) -> AttrValue {
        AttrValue::String(text.into())
    }

    /// Create a number attribute from a runtime number, writing its exact
    /// decimal text. Fails for non-finite floats.
    pub fn number<N: Into<Number>>(number: N) -> Result<AttrValue, ValueError> {
        Ok(AttrValue::Number(number.into().to_decimal()?))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::String(_) => ValueKind::String,
            AttrValue::Number(_) => ValueKind::Number,
            AttrValue::Boolean(_) => ValueKind::Boolean,
            AttrValue::Null => ValueKind::Null,
            AttrValue::Binary(_) => ValueKind::Binary,
            AttrValue::StringSet(_) => ValueKind::StringSet,
            AttrValue::NumberSet(_) => ValueKind::NumberSet,
            AttrValue::BinarySet(_) => ValueKind::BinarySet,
            AttrValue::List(_) => ValueKind::List,
            AttrValue::Map(_) => ValueKind::Map,
        }
    }

    /// The wire tag of the populated variant.
    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&str> {
        match self {
            AttrValue::Number(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            AttrValue::Binary(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&AttributeMap> {
        match self {
            AttrValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl ValueKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ValueKind::String => "S",
            ValueKind::Number => "N",
            ValueKind::Boolean => "BOOL",
            ValueKind::Null => "NULL",
            ValueKind::Binary => "B",
            ValueKind::StringSet => "SS",
            ValueKind::NumberSet => "NS",
            ValueKind::BinarySet => "BS",
            ValueKind::List => "L",
            ValueKind::Map => "M",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::String(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::String(text)
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        AttrValue::Boolean(flag)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(n.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n.to_string())
    }
}

impl From<u64> for AttrValue {
    fn from(n: u64) -> Self {
        AttrValue::Number(n.to_string())
    }
}

impl From<Blob> for AttrValue {
    fn from(blob: Blob) -> Self {
        AttrValue::Binary(blob)
    }
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::String(text) => write!(f, "{{S: {}}}", text),
            AttrValue::Number(text) => write!(f, "{{N: {}}}", text),
            AttrValue::Boolean(flag) => write!(f, "{{BOOL: {}}}", flag),
            AttrValue::Null => write!(f, "{{NULL: true}}"),
            AttrValue::Binary(blob) => write!(f, "{{B: {}}}", blob),
            AttrValue::StringSet(items) => write!(f, "{{SS: [{}]}}", items.join(", ")),
            AttrValue::NumberSet(items) => write!(f, "{{NS: [{}]}}", items.join(", ")),
            AttrValue::BinarySet(items) => {
                write!(f, "{{BS: [")?;
                for (i, blob) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", blob)?;
                }
                write!(f, "]}}")
            }
            AttrValue::List(items) => {
                write!(f, "{{L: [")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]}}")
            }
            AttrValue::Map(entries) => {
                write!(f, "{{M: {{")?;
                let mut keys = entries.keys().collect::<Vec<_>>();
                keys.sort();
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, entries[key])?;
                }
                write!(f, "}}}}")
            }
        }
    }
}
