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

#[doc(inline)]
pub use dynomap_model as model;

/// The mapping engine: traits implemented by domain types and the entry
/// points that move instances to and from attribute maps.
pub mod mapper {
    pub use dynomap_mapper::{
        from_db, from_db_one, to_db, to_db_one, DomainObject, DomainReadable, DomainSet,
        DomainValue, DomainWritable, MappedModel, MapperError,
    };
}

/// Declarative model metadata and the registry it is frozen into.
pub mod schema {
    pub use dynomap_mapper::schema::{
        AttrType, CustomMapper, IndexKey, IndexType, KeyRole, ModelSchema, ModelSchemaBuilder,
        PropertySchema,
    };
    pub use dynomap_mapper::{SchemaRegistry, SchemaRegistryBuilder};
}

/// Condition expressions over stored attributes.
pub mod condition {
    pub use dynomap_mapper::condition::{Condition, ExpressionParams};
}
