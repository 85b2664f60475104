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

use dynomap_model::{AttrValue, AttributeMap};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{DomainObject, DomainValue, DomainWritable, MappedModel};
use crate::error::MapperError;
use crate::schema::registry::SchemaRegistry;
use crate::schema::{AttrType, CustomMapper, PropertySchema};

/// The variant an attribute value will take for a given runtime value, decided
/// before any recursion into its contents.
#[derive(Debug)]
enum Classification<'a> {
    Null,
    Custom(&'a CustomMapper),
    Timestamp,
    Text,
    Numeric,
    Boolean,
    Binary,
    Collection(CollectionTag),
    Object,
}

/// How a collection will be tagged on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CollectionTag {
    List,
    StringSet,
    NumberSet,
    BinarySet,
}

/// Decide which attribute value variant a runtime value produces. Pure; first
/// match wins:
///
/// 1. nulls;
/// 2. a custom mapper registered for the property, which overrides everything;
/// 3. timestamps, written as canonical UTC strings;
/// 4. the primitive scalars;
/// 5. binary buffers;
/// 6. collections (see [`collection_tag`]);
/// 7. compound objects, which become maps.
fn classify<'a>(
    value: &DomainValue,
    meta: Option<&'a PropertySchema>,
) -> Result<Classification<'a>, MapperError> {
    if matches!(value, DomainValue::Null) {
        return Ok(Classification::Null);
    }
    if let Some(mapper) = meta.and_then(|prop| prop.custom.as_ref()) {
        return Ok(Classification::Custom(mapper));
    }
    let declared = meta.and_then(|prop| prop.declared);
    match value {
        DomainValue::Timestamp(_) => Ok(Classification::Timestamp),
        DomainValue::String(_) => Ok(Classification::Text),
        DomainValue::Number(_) => Ok(Classification::Numeric),
        DomainValue::Boolean(_) => Ok(Classification::Boolean),
        DomainValue::Binary(_) => Ok(Classification::Binary),
        DomainValue::List(items) => {
            if items.is_empty() {
                Err(MapperError::EmptyCollection)
            } else if declared == Some(AttrType::Array) {
                Ok(Classification::Collection(CollectionTag::List))
            } else {
                // An ordered sequence only qualifies for a set tag when its
                // elements are distinct; sets are unique by construction.
                Ok(Classification::Collection(collection_tag(items, true)))
            }
        }
        DomainValue::Set(set) => {
            if set.is_empty() {
                Err(MapperError::EmptyCollection)
            } else if declared == Some(AttrType::Array) {
                Ok(Classification::Collection(CollectionTag::List))
            } else {
                Ok(Classification::Collection(collection_tag(set.elements(), false)))
            }
        }
        DomainValue::Object(_) => Ok(Classification::Object),
        DomainValue::Null => Ok(Classification::Null),
    }
}

/// Inspect the element kinds of a collection. Homogeneous strings, numbers or
/// binary buffers produce the corresponding native set tag; heterogeneous or
/// complex elements fall back to a list, because the wire format has no set
/// primitive for them.
fn collection_tag(elements: &[DomainValue], require_distinct: bool) -> CollectionTag {
    let tag = if elements.iter().all(|el| matches!(el, DomainValue::String(_))) {
        CollectionTag::StringSet
    } else if elements.iter().all(|el| matches!(el, DomainValue::Number(_))) {
        CollectionTag::NumberSet
    } else if elements.iter().all(|el| matches!(el, DomainValue::Binary(_))) {
        CollectionTag::BinarySet
    } else {
        return CollectionTag::List;
    };
    if require_distinct && !all_distinct(elements) {
        CollectionTag::List
    } else {
        tag
    }
}

fn all_distinct(elements: &[DomainValue]) -> bool {
    elements
        .iter()
        .enumerate()
        .all(|(i, el)| !elements[..i].contains(el))
}

/// Encode a single value. `None` stands for an absent value, which cannot be
/// represented at the top level of an attribute (absence is only expressible
/// by omission inside a map) and is rejected.
pub fn to_db_one(
    value: Option<&DomainValue>,
    meta: Option<&PropertySchema>,
    registry: &SchemaRegistry,
) -> Result<AttrValue, MapperError> {
    match value {
        Some(value) => encode_value(value, meta, registry),
        None => Err(MapperError::RequiredValue),
    }
}

/// Encode a model instance into an attribute map under its registered schema.
///
/// Properties are processed in schema declaration order. Transient properties
/// and absent fields are omitted; auto generated properties synthesize a fresh
/// v4 UUID and reject explicitly supplied values. Any attribute that fails to
/// encode aborts the whole call.
pub fn to_db<M: MappedModel>(
    instance: &M,
    registry: &SchemaRegistry,
) -> Result<AttributeMap, MapperError> {
    let schema = registry
        .resolve(M::MODEL_NAME)
        .ok_or_else(|| MapperError::UnregisteredModel {
            model: M::MODEL_NAME.to_string(),
        })?;
    debug!(model = %M::MODEL_NAME, table = %schema.table_name(), "mapping instance to attribute map");
    let object = instance.as_domain().into_object()?;
    let mut attrs = AttributeMap::new();
    for prop in schema.properties() {
        if prop.transient {
            continue;
        }
        let field = object.get(prop.name);
        if prop.generate_uuid {
            if field.is_some() {
                return Err(MapperError::PredefinedAutogeneratedValue {
                    property: prop.name.to_string(),
                });
            }
            attrs.insert(
                prop.name.to_string(),
                AttrValue::String(Uuid::new_v4().to_string()),
            );
            continue;
        }
        if let Some(value) = field {
            attrs.insert(
                prop.name.to_string(),
                encode_value(value, Some(prop), registry)?,
            );
        }
    }
    Ok(attrs)
}

fn encode_value(
    value: &DomainValue,
    meta: Option<&PropertySchema>,
    registry: &SchemaRegistry,
) -> Result<AttrValue, MapperError> {
    match (classify(value, meta)?, value) {
        (Classification::Null, _) => Ok(AttrValue::Null),
        (Classification::Custom(mapper), _) => (mapper.to_db)(value.clone()),
        (Classification::Timestamp, DomainValue::Timestamp(ts)) => {
            Ok(AttrValue::String(ts.format()))
        }
        (Classification::Text, DomainValue::String(text)) => {
            Ok(AttrValue::String(text.clone()))
        }
        (Classification::Numeric, DomainValue::Number(n)) => {
            Ok(AttrValue::Number(n.to_decimal()?))
        }
        (Classification::Boolean, DomainValue::Boolean(flag)) => Ok(AttrValue::Boolean(*flag)),
        (Classification::Binary, DomainValue::Binary(blob)) => {
            Ok(AttrValue::Binary(blob.clone()))
        }
        (Classification::Collection(tag), DomainValue::List(items)) => {
            encode_collection(items, tag, registry)
        }
        (Classification::Collection(tag), DomainValue::Set(set)) => {
            encode_collection(set.elements(), tag, registry)
        }
        (Classification::Object, DomainValue::Object(object)) => {
            encode_object(object, registry)
        }
        _ => Err(MapperError::UnsupportedShape { kind: value.kind() }),
    }
}

fn encode_collection(
    elements: &[DomainValue],
    tag: CollectionTag,
    registry: &SchemaRegistry,
) -> Result<AttrValue, MapperError> {
    match tag {
        CollectionTag::StringSet => {
            let mut items = Vec::with_capacity(elements.len());
            for el in elements {
                match el {
                    DomainValue::String(text) => items.push(text.clone()),
                    other => return Err(MapperError::UnsupportedShape { kind: other.kind() }),
                }
            }
            Ok(AttrValue::StringSet(items))
        }
        CollectionTag::NumberSet => {
            let mut items = Vec::with_capacity(elements.len());
            for el in elements {
                match el {
                    DomainValue::Number(n) => items.push(n.to_decimal()?),
                    other => return Err(MapperError::UnsupportedShape { kind: other.kind() }),
                }
            }
            Ok(AttrValue::NumberSet(items))
        }
        CollectionTag::BinarySet => {
            let mut items = Vec::with_capacity(elements.len());
            for el in elements {
                match el {
                    DomainValue::Binary(blob) => items.push(blob.clone()),
                    other => return Err(MapperError::UnsupportedShape { kind: other.kind() }),
                }
            }
            Ok(AttrValue::BinarySet(items))
        }
        CollectionTag::List => {
            let mut items = Vec::with_capacity(elements.len());
            for el in elements {
                items.push(encode_value(el, None, registry)?);
            }
            Ok(AttrValue::List(items))
        }
    }
}

/// Encode a compound object as a map. When the object is an instance of a
/// registered model each field is encoded under that property's metadata
/// (transient properties are dropped); otherwise fields are encoded by value
/// shape alone.
fn encode_object(
    object: &DomainObject,
    registry: &SchemaRegistry,
) -> Result<AttrValue, MapperError> {
    let schema = object.model().and_then(|model| registry.resolve(model));
    let mut entries = AttributeMap::new();
    for (name, value) in object.fields() {
        let prop = schema.and_then(|schema| schema.property(name));
        if prop.map_or(false, |prop| prop.transient) {
            continue;
        }
        entries.insert(name.to_string(), encode_value(value, prop, registry)?);
    }
    Ok(AttrValue::Map(entries))
}
