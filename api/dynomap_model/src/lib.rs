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

//! # Dynomap wire value model
//!
//! This crate contains the wire level representation of attribute values as they are
//! exchanged with the storage backend: the [`AttrValue`] tagged union (matching the
//! DynamoDB attribute value JSON shape), the [`AttributeMap`] describing one encoded
//! record, and the scalar building blocks [`Number`], [`Timestamp`] and [`Blob`].
//!
//! The mapping between domain objects and this model lives in `dynomap_mapper`.

mod blob;
mod error;
mod num;
mod time;
mod value;

pub use blob::Blob;
pub use error::ValueError;
pub use num::Number;
pub use time::Timestamp;
pub use value::{AttrValue, AttributeMap, ValueKind};
