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

use tracing::debug;

use crate::domain::MappedModel;
use crate::error::MapperError;
use crate::schema::{ModelSchema, PropertySchema};

/// The resolver consulted by the encoder and decoder for model metadata.
///
/// The registry is populated once, before the first mapping call, and is
/// immutable afterwards: [`SchemaRegistryBuilder`] is the only way to add
/// schemas and freezing it with [`SchemaRegistryBuilder::build`] gives up the
/// ability to write. Mapping calls borrow the registry, so concurrent use
/// needs no coordination.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, ModelSchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            schemas: HashMap::new(),
        }
    }

    /// A registry with no registered models; shape inference still applies.
    pub fn empty() -> SchemaRegistry {
        SchemaRegistry::default()
    }

    pub fn resolve(&self, model: &str) -> Option<&ModelSchema> {
        self.schemas.get(model)
    }

    pub fn resolve_property(&self, model: &str, property: &str) -> Option<&PropertySchema> {
        self.resolve(model)?.property(property)
    }

    pub fn is_registered(&self, model: &str) -> bool {
        self.schemas.contains_key(model)
    }
}

/// Write stage of the registry lifecycle.
pub struct SchemaRegistryBuilder {
    schemas: HashMap<&'static str, ModelSchema>,
}

impl SchemaRegistryBuilder {
    /// Register the schema of a mapped model. Registering two models under
    /// the same name is an error.
    pub fn register<M: MappedModel>(mut self) -> Result<SchemaRegistryBuilder, MapperError> {
        if self.schemas.contains_key(M::MODEL_NAME) {
            return Err(MapperError::DuplicateModel {
                model: M::MODEL_NAME.to_string(),
            });
        }
        let schema = M::schema()?;
        debug!(model = %M::MODEL_NAME, table = %schema.table_name(), "registered model schema");
        self.schemas.insert(M::MODEL_NAME, schema);
        Ok(self)
    }

    /// Freeze the registry; no further registrations are possible.
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}
