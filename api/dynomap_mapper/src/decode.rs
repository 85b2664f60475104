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

use dynomap_model::{AttrValue, AttributeMap, Number, Timestamp};
use tracing::debug;

use crate::domain::{DomainObject, DomainSet, DomainValue, MappedModel};
use crate::error::MapperError;
use crate::schema::registry::SchemaRegistry;
use crate::schema::{AttrType, ModelSchema, PropertySchema};

/// Decode a single attribute value back into a runtime value.
///
/// Decoding mirrors the classifier: nulls first, then a custom mapper when one
/// is registered for the property, then the wire tag guided by the declared
/// type where one exists. Strings that carry the canonical timestamp format
/// revive as timestamps unless a different type is declared; a declared set
/// turns a wire list back into a set and a declared array keeps native sets
/// ordered.
pub fn from_db_one(
    attr: &AttrValue,
    meta: Option<&PropertySchema>,
    registry: &SchemaRegistry,
) -> Result<DomainValue, MapperError> {
    if attr.is_null() {
        return Ok(DomainValue::Null);
    }
    if let Some(mapper) = meta.and_then(|prop| prop.custom.as_ref()) {
        return (mapper.from_db)(attr.clone());
    }
    let declared = meta.and_then(|prop| prop.declared);
    match attr {
        AttrValue::Null => Ok(DomainValue::Null),
        AttrValue::String(text) => Ok(decode_string(text, declared)?),
        AttrValue::Number(text) => Ok(DomainValue::Number(Number::from_decimal(text)?)),
        AttrValue::Boolean(flag) => Ok(DomainValue::Boolean(*flag)),
        AttrValue::Binary(blob) => Ok(DomainValue::Binary(blob.clone())),
        AttrValue::StringSet(items) => {
            let elements = items.iter().map(|item| DomainValue::text(item.as_str()));
            Ok(collect_native_set(elements, declared))
        }
        AttrValue::NumberSet(items) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                elements.push(DomainValue::Number(Number::from_decimal(item)?));
            }
            Ok(collect_native_set(elements, declared))
        }
        AttrValue::BinarySet(items) => {
            let elements = items.iter().map(|blob| DomainValue::Binary(blob.clone()));
            Ok(collect_native_set(elements, declared))
        }
        AttrValue::List(items) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                elements.push(from_db_one(item, None, registry)?);
            }
            if declared == Some(AttrType::Set) {
                Ok(DomainValue::Set(elements.into_iter().collect()))
            } else {
                Ok(DomainValue::List(elements))
            }
        }
        AttrValue::Map(entries) => {
            if let Some(AttrType::Model(model)) = declared {
                let schema =
                    registry
                        .resolve(model)
                        .ok_or_else(|| MapperError::UnregisteredModel {
                            model: model.to_string(),
                        })?;
                Ok(DomainValue::Object(decode_object(entries, schema, registry)?))
            } else {
                let mut object = DomainObject::new();
                for (name, value) in entries {
                    object.insert(name.clone(), from_db_one(value, None, registry)?);
                }
                Ok(DomainValue::Object(object))
            }
        }
    }
}

/// Decode an attribute map into an instance of a registered model.
///
/// Only the properties the schema declares are considered; attributes under
/// unknown names are dropped silently, as are transient properties that leaked
/// into the stored record. Absent attributes simply produce no field, leaving
/// it to the model's typed reconstruction to decide whether that is an error.
pub fn from_db<M: MappedModel>(
    attrs: &AttributeMap,
    registry: &SchemaRegistry,
) -> Result<M, MapperError> {
    let schema = registry
        .resolve(M::MODEL_NAME)
        .ok_or_else(|| MapperError::UnregisteredModel {
            model: M::MODEL_NAME.to_string(),
        })?;
    debug!(model = %M::MODEL_NAME, table = %schema.table_name(), "mapping attribute map to instance");
    let object = decode_object(attrs, schema, registry)?;
    M::try_from_domain(DomainValue::Object(object))
}

fn decode_string(text: &str, declared: Option<AttrType>) -> Result<DomainValue, MapperError> {
    match declared {
        Some(AttrType::Timestamp) => Ok(DomainValue::Timestamp(Timestamp::parse(text)?)),
        Some(_) => Ok(DomainValue::text(text)),
        None => Ok(match Timestamp::parse_opt(text) {
            Some(ts) => DomainValue::Timestamp(ts),
            None => DomainValue::text(text),
        }),
    }
}

/// Native set tags decode as sets unless the property declares an array, in
/// which case the stored order is preserved in a list.
fn collect_native_set<I>(elements: I, declared: Option<AttrType>) -> DomainValue
where
    I: IntoIterator<Item = DomainValue>,
{
    if declared == Some(AttrType::Array) {
        DomainValue::List(elements.into_iter().collect())
    } else {
        DomainValue::Set(elements.into_iter().collect())
    }
}

fn decode_object(
    attrs: &AttributeMap,
    schema: &ModelSchema,
    registry: &SchemaRegistry,
) -> Result<DomainObject, MapperError> {
    let mut object = DomainObject::for_model(schema.model());
    for prop in schema.properties() {
        if prop.transient {
            continue;
        }
        if let Some(attr) = attrs.get(prop.name) {
            object.insert(prop.name, from_db_one(attr, Some(prop), registry)?);
        }
    }
    Ok(object)
}
