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

//! Condition expressions for filtered reads and conditional writes. A
//! [`Condition`] is an opaque triple of expression text and the placeholder
//! substitutions it references; every literal embedded in one passes through
//! the encoder so the values it carries are always well formed on the wire.

use std::collections::HashMap;

use dynomap_model::{AttrValue, AttributeMap};

use crate::domain::DomainValue;
use crate::encode::to_db_one;
use crate::error::MapperError;
use crate::schema::registry::SchemaRegistry;
use crate::schema::PropertySchema;

/// A boolean expression over attributes together with the placeholder
/// substitutions it references. Attribute names are always routed through
/// `#name` placeholders so reserved words never leak into expression text,
/// and literals through `:value` placeholders. Per clause numeric tags keep
/// placeholders collision free when conditions are merged.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    statement: String,
    attribute_names: HashMap<String, String>,
    attribute_values: AttributeMap,
}

impl Condition {
    /// An equality clause `#path_<tag> = :path_<tag>`. The literal is encoded
    /// under the property metadata, so declared types and custom mappers apply
    /// to condition values exactly as they do to stored attributes.
    pub fn attribute_equals(
        path: &str,
        value: &DomainValue,
        tag: usize,
        meta: Option<&PropertySchema>,
        registry: &SchemaRegistry,
    ) -> Result<Condition, MapperError> {
        Condition::comparison("=", path, value, tag, meta, registry)
    }

    /// A `begins_with(#path, :value)` clause over a string literal.
    pub fn begins_with(
        path: &str,
        prefix: &str,
        tag: usize,
    ) -> Condition {
        let name_key = placeholder('#', path, tag);
        let value_key = placeholder(':', path, tag);
        let statement = format!("begins_with ({}, {})", name_key, value_key);
        let mut attribute_names = HashMap::new();
        attribute_names.insert(name_key, path.to_string());
        let mut attribute_values = AttributeMap::new();
        attribute_values.insert(value_key, AttrValue::text(prefix));
        Condition {
            statement,
            attribute_names,
            attribute_values,
        }
    }

    /// An `attribute_exists(#path)` clause; no literal is involved.
    pub fn attribute_exists(path: &str, tag: usize) -> Condition {
        let name_key = placeholder('#', path, tag);
        let statement = format!("attribute_exists ({})", name_key);
        let mut attribute_names = HashMap::new();
        attribute_names.insert(name_key, path.to_string());
        Condition {
            statement,
            attribute_names,
            attribute_values: AttributeMap::new(),
        }
    }

    fn comparison(
        operator: &str,
        path: &str,
        value: &DomainValue,
        tag: usize,
        meta: Option<&PropertySchema>,
        registry: &SchemaRegistry,
    ) -> Result<Condition, MapperError> {
        let name_key = placeholder('#', path, tag);
        let value_key = placeholder(':', path, tag);
        let statement = format!("{} {} {}", name_key, operator, value_key);
        let mut attribute_names = HashMap::new();
        attribute_names.insert(name_key, path.to_string());
        let mut attribute_values = AttributeMap::new();
        attribute_values.insert(value_key, to_db_one(Some(value), meta, registry)?);
        Ok(Condition {
            statement,
            attribute_names,
            attribute_values,
        })
    }

    pub fn statement(&self) -> &str {
        self.statement.as_str()
    }

    pub fn attribute_names(&self) -> &HashMap<String, String> {
        &self.attribute_names
    }

    pub fn attribute_values(&self) -> &AttributeMap {
        &self.attribute_values
    }
}

fn placeholder(sigil: char, path: &str, tag: usize) -> String {
    format!("{}{}_{}", sigil, path.replace('.', "_"), tag)
}

/// The expression slice of a read or write request: the assembled filter and
/// key condition texts plus the placeholder substitutions they reference,
/// merged across every condition added so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionParams {
    pub filter_expression: Option<String>,
    pub key_condition_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
    pub expression_attribute_values: AttributeMap,
}

impl ExpressionParams {
    pub fn new() -> ExpressionParams {
        ExpressionParams::default()
    }

    /// Merge a condition into the filter expression. An existing expression is
    /// kept and the new statement appended as `existing AND (new)`.
    pub fn add_filter_condition(&mut self, condition: Condition) {
        let Condition {
            statement,
            attribute_names,
            attribute_values,
        } = condition;
        merge_statement(&mut self.filter_expression, statement);
        self.expression_attribute_names.extend(attribute_names);
        self.expression_attribute_values.extend(attribute_values);
    }

    /// Merge a condition into the key condition expression, with the same
    /// `AND` parenthesization as filters.
    pub fn add_key_condition(&mut self, condition: Condition) {
        let Condition {
            statement,
            attribute_names,
            attribute_values,
        } = condition;
        merge_statement(&mut self.key_condition_expression, statement);
        self.expression_attribute_names.extend(attribute_names);
        self.expression_attribute_values.extend(attribute_values);
    }
}

fn merge_statement(existing: &mut Option<String>, statement: String) {
    *existing = Some(match existing.take() {
        Some(current) => format!("{} AND ({})", current, statement),
        None => statement,
    });
}
