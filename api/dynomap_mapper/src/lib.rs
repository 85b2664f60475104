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

//! Bidirectional mapping between domain model instances and tagged attribute
//! maps.
//!
//! The engine has two tightly coupled directions. [`to_db`] encodes a model
//! instance into an [`AttributeMap`](dynomap_model::AttributeMap), classifying
//! each runtime value into its wire variant under the model's registered
//! metadata; [`from_db`] reverses the trip, guided by the same metadata.
//! [`to_db_one`] and [`from_db_one`] do the same for a single value.
//!
//! Domain types take part by describing themselves as a [`DomainValue`]
//! through the [`DomainWritable`] and [`DomainReadable`] traits, and mapped
//! models additionally carry a [`ModelSchema`](schema::ModelSchema) that is
//! registered once in a [`SchemaRegistry`] before the first mapping call.
//! Conditions over stored attributes are assembled in [`condition`], with
//! every embedded literal routed through the encoder.

pub mod condition;
mod decode;
mod domain;
mod encode;
mod error;
pub mod schema;

pub use decode::{from_db, from_db_one};
pub use domain::{
    DomainObject, DomainReadable, DomainSet, DomainValue, DomainWritable, MappedModel,
};
pub use encode::{to_db, to_db_one};
pub use error::MapperError;
pub use schema::registry::{SchemaRegistry, SchemaRegistryBuilder};
