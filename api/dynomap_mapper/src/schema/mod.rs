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

//! Declarative mapping metadata. A [`ModelSchema`] describes one mapped model:
//! its table name and an ordered collection of [`PropertySchema`] records. The
//! engine only ever reads this metadata; it is built once per model through
//! the fluent builders here and frozen inside a
//! [`SchemaRegistry`](registry::SchemaRegistry) before the first mapping call.

use dynomap_model::AttrValue;

use crate::domain::DomainValue;
use crate::error::MapperError;

pub mod registry;

/// The declared type of a property, overriding value shape inference where
/// the two disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrType {
    String,
    Number,
    Boolean,
    Binary,
    Timestamp,
    /// An ordered sequence; suppresses set tagging of homogeneous elements.
    Array,
    /// An unordered unique collection; makes a wire list decode as a set.
    Set,
    /// A free-form string keyed map.
    Map,
    /// An instance of another registered model, resolved by name on decode.
    Model(&'static str),
}

/// The role a property plays in the table's primary key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyRole {
    #[default]
    None,
    PartitionKey,
    SortKey,
}

/// The kind of secondary index a property participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexType {
    Gsi,
    Lsi,
}

/// Membership of a property in a secondary index key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexKey {
    pub index_name: &'static str,
    pub index_type: IndexType,
    pub role: KeyRole,
}

/// A caller supplied pair of pure conversion functions that fully overrides
/// the mapping of one property, in both directions. When present it has
/// absolute priority over every inference rule and declared type hint.
#[derive(Clone, Copy)]
pub struct CustomMapper {
    pub to_db: fn(DomainValue) -> Result<AttrValue, MapperError>,
    pub from_db: fn(AttrValue) -> Result<DomainValue, MapperError>,
}

impl std::fmt::Debug for CustomMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CustomMapper")
    }
}

/// Mapping metadata for a single property of a model.
#[derive(Clone, Debug)]
pub struct PropertySchema {
    pub name: &'static str,
    pub declared: Option<AttrType>,
    pub key_role: KeyRole,
    pub index_key: Option<IndexKey>,
    /// Transient properties are excluded from mapping entirely.
    pub transient: bool,
    /// A fresh v4 UUID is synthesized on encode; supplying a value fails.
    pub generate_uuid: bool,
    pub custom: Option<CustomMapper>,
}

impl PropertySchema {
    pub fn new(name: &'static str) -> PropertySchema {
        PropertySchema {
            name,
            declared: None,
            key_role: KeyRole::None,
            index_key: None,
            transient: false,
            generate_uuid: false,
            custom: None,
        }
    }

    pub fn of_type(mut self, declared: AttrType) -> PropertySchema {
        self.declared = Some(declared);
        self
    }

    pub fn partition_key(mut self) -> PropertySchema {
        self.key_role = KeyRole::PartitionKey;
        self
    }

    pub fn sort_key(mut self) -> PropertySchema {
        self.key_role = KeyRole::SortKey;
        self
    }

    /// A partition key whose value is auto generated at encode time.
    pub fn partition_key_uuid(self) -> PropertySchema {
        self.partition_key().auto_generated()
    }

    pub fn gsi_partition_key(mut self, index_name: &'static str) -> PropertySchema {
        self.index_key = Some(IndexKey {
            index_name,
            index_type: IndexType::Gsi,
            role: KeyRole::PartitionKey,
        });
        self
    }

    pub fn gsi_sort_key(mut self, index_name: &'static str) -> PropertySchema {
        self.index_key = Some(IndexKey {
            index_name,
            index_type: IndexType::Gsi,
            role: KeyRole::SortKey,
        });
        self
    }

    pub fn lsi_sort_key(mut self, index_name: &'static str) -> PropertySchema {
        self.index_key = Some(IndexKey {
            index_name,
            index_type: IndexType::Lsi,
            role: KeyRole::SortKey,
        });
        self
    }

    pub fn transient(mut self) -> PropertySchema {
        self.transient = true;
        self
    }

    pub fn auto_generated(mut self) -> PropertySchema {
        self.generate_uuid = true;
        self
    }

    pub fn with_mapper(mut self, mapper: CustomMapper) -> PropertySchema {
        self.custom = Some(mapper);
        self
    }
}

/// The registered schema of one mapped model.
#[derive(Clone, Debug)]
pub struct ModelSchema {
    model: &'static str,
    table_name: String,
    properties: Vec<PropertySchema>,
}

impl ModelSchema {
    pub fn builder<T: Into<String>>(model: &'static str, table_name: T) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            model,
            table_name: table_name.into(),
            properties: Vec::new(),
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// The properties of the model, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertySchema> {
        self.properties.iter()
    }

    pub fn partition_key(&self) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|prop| prop.key_role == KeyRole::PartitionKey)
    }

    pub fn sort_key(&self) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|prop| prop.key_role == KeyRole::SortKey)
    }

    /// The key properties of a named secondary index.
    pub fn index_keys<'a>(
        &'a self,
        index_name: &'a str,
    ) -> impl Iterator<Item = &'a PropertySchema> + 'a {
        self.properties.iter().filter(move |prop| {
            prop.index_key
                .map(|key| key.index_name == index_name)
                .unwrap_or(false)
        })
    }
}

/// Builder for [`ModelSchema`]; the explicit registration step that stands in
/// for attaching metadata with decorators.
pub struct ModelSchemaBuilder {
    model: &'static str,
    table_name: String,
    properties: Vec<PropertySchema>,
}

impl ModelSchemaBuilder {
    pub fn property(mut self, property: PropertySchema) -> ModelSchemaBuilder {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> Result<ModelSchema, MapperError> {
        let ModelSchemaBuilder {
            model,
            table_name,
            properties,
        } = self;
        validate_table_name(&table_name)?;
        Ok(ModelSchema {
            model,
            table_name,
            properties,
        })
    }
}

fn validate_table_name(name: &str) -> Result<(), MapperError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if (3..=255).contains(&name.len()) && valid_chars {
        Ok(())
    } else {
        Err(MapperError::InvalidTableName {
            name: name.to_string(),
        })
    }
}
