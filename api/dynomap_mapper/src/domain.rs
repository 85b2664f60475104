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

use dynomap_model::{Blob, Number, Timestamp};

use crate::error::MapperError;
use crate::schema::ModelSchema;

/// The closed set of runtime shapes the mapping engine recognizes. Rather than
/// inspecting arbitrary values, the classifier operates over this union; domain
/// types describe themselves as a [`DomainValue`] through [`DomainWritable`]
/// and are rebuilt from one through [`DomainReadable`].
#[derive(Clone, Debug, PartialEq)]
pub enum DomainValue {
    Null,
    String(String),
    Number(Number),
    Boolean(bool),
    Binary(Blob),
    Timestamp(Timestamp),
    /// An ordered sequence; duplicates allowed, element kinds may vary.
    List(Vec<DomainValue>),
    /// An unordered collection with unique-element semantics.
    Set(DomainSet),
    /// A compound object, optionally an instance of a registered model.
    Object(DomainObject),
}

impl DomainValue {
    pub fn text<T: Into<String>>(text: T) -> DomainValue {
        DomainValue::String(text.into())
    }

    pub fn number<N: Into<Number>>(number: N) -> DomainValue {
        DomainValue::Number(number.into())
    }

    /// A short name for the shape of this value, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainValue::Null => "null",
            DomainValue::String(_) => "string",
            DomainValue::Number(_) => "number",
            DomainValue::Boolean(_) => "boolean",
            DomainValue::Binary(_) => "binary",
            DomainValue::Timestamp(_) => "timestamp",
            DomainValue::List(_) => "list",
            DomainValue::Set(_) => "set",
            DomainValue::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DomainValue::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            DomainValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DomainValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            DomainValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DomainValue]> {
        match self {
            DomainValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&DomainSet> {
        match self {
            DomainValue::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DomainObject> {
        match self {
            DomainValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_object(self) -> Result<DomainObject, MapperError> {
        match self {
            DomainValue::Object(object) => Ok(object),
            other => Err(MapperError::KindMismatch {
                expected: "an object",
                actual: other.kind(),
            }),
        }
    }
}

/// An insertion-ordered collection with unique-element semantics. Inserting an
/// element equal to one already present is a no-op.
#[derive(Clone, Debug, Default)]
pub struct DomainSet {
    elements: Vec<DomainValue>,
}

impl DomainSet {
    pub fn new() -> DomainSet {
        DomainSet::default()
    }

    pub fn insert(&mut self, value: DomainValue) -> bool {
        if self.elements.contains(&value) {
            false
        } else {
            self.elements.push(value);
            true
        }
    }

    pub fn contains(&self, value: &DomainValue) -> bool {
        self.elements.contains(value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainValue> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[DomainValue] {
        self.elements.as_slice()
    }

    pub fn into_elements(self) -> Vec<DomainValue> {
        self.elements
    }
}

/// Sets compare without regard to insertion order.
impl PartialEq for DomainSet {
    fn eq(&self, other: &Self) -> bool {
        self.elements.len() == other.elements.len()
            && self.elements.iter().all(|el| other.contains(el))
    }
}

impl FromIterator<DomainValue> for DomainSet {
    fn from_iter<I: IntoIterator<Item = DomainValue>>(iter: I) -> Self {
        let mut set = DomainSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for DomainSet {
    type Item = DomainValue;
    type IntoIter = std::vec::IntoIter<DomainValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// The fields of a compound object, in declaration order, together with the
/// name of the registered model the object is an instance of (if any). Field
/// names are unique; inserting under an existing name replaces the value.
#[derive(Clone, Debug, Default)]
pub struct DomainObject {
    model: Option<&'static str>,
    fields: Vec<(String, DomainValue)>,
}

impl DomainObject {
    /// An anonymous object, mapped by value shape alone.
    pub fn new() -> DomainObject {
        DomainObject::default()
    }

    /// An object that is an instance of the named registered model, mapped
    /// with that model's per-property metadata.
    pub fn for_model(model: &'static str) -> DomainObject {
        DomainObject {
            model: Some(model),
            fields: Vec::new(),
        }
    }

    pub fn model(&self) -> Option<&'static str> {
        self.model
    }

    /// Add a field, builder style.
    pub fn with_field<T: DomainWritable>(mut self, name: &str, value: T) -> DomainObject {
        self.insert(name, value.into_domain());
        self
    }

    /// Add a field only when a value is present. An absent field is omitted
    /// from the encoded record entirely, while an explicit [`DomainValue::Null`]
    /// encodes as a null attribute.
    pub fn with_field_opt<T: DomainWritable>(mut self, name: &str, value: Option<T>) -> DomainObject {
        if let Some(value) = value {
            self.insert(name, value.into_domain());
        }
        self
    }

    pub fn insert<K: Into<String>>(&mut self, name: K, value: DomainValue) {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            existing.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&DomainValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Remove and return a field, used by typed reconstructions.
    pub fn take(&mut self, name: &str) -> Option<DomainValue> {
        let index = self.fields.iter().position(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Remove a field, failing when it is absent.
    pub fn take_required(&mut self, name: &'static str) -> Result<DomainValue, MapperError> {
        self.take(name).ok_or(MapperError::MissingField { field: name })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &DomainValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Objects compare as maps: same model, same keys, equal values, regardless of
/// field order.
impl PartialEq for DomainObject {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

/// Trait for types that can describe themselves as a [`DomainValue`] for
/// encoding.
pub trait DomainWritable {
    fn as_domain(&self) -> DomainValue;

    fn into_domain(self) -> DomainValue
    where
        Self: Sized,
    {
        self.as_domain()
    }
}

/// Trait for types that can be rebuilt from a decoded [`DomainValue`].
pub trait DomainReadable: Sized {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError>;
}

/// A domain type mapped to and from attribute maps under a registered schema.
pub trait MappedModel: DomainWritable + DomainReadable {
    /// The name the model's schema is registered under; nested objects carry
    /// it so the engine can resolve their per-property metadata.
    const MODEL_NAME: &'static str;

    /// The schema registered for this model. Construction happens once, at
    /// registration time; the registry owns the result thereafter.
    fn schema() -> Result<ModelSchema, MapperError>;
}

impl DomainWritable for DomainValue {
    fn as_domain(&self) -> DomainValue {
        self.clone()
    }

    fn into_domain(self) -> DomainValue {
        self
    }
}

impl DomainReadable for DomainValue {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        Ok(value)
    }
}

impl DomainWritable for String {
    fn as_domain(&self) -> DomainValue {
        DomainValue::String(self.clone())
    }

    fn into_domain(self) -> DomainValue {
        DomainValue::String(self)
    }
}

impl DomainWritable for &str {
    fn as_domain(&self) -> DomainValue {
        DomainValue::String(self.to_string())
    }
}

impl DomainReadable for String {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::String(text) => Ok(text),
            other => Err(MapperError::KindMismatch {
                expected: "a string",
                actual: other.kind(),
            }),
        }
    }
}

impl DomainWritable for bool {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Boolean(*self)
    }
}

impl DomainReadable for bool {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Boolean(flag) => Ok(flag),
            other => Err(MapperError::KindMismatch {
                expected: "a boolean",
                actual: other.kind(),
            }),
        }
    }
}

impl DomainWritable for Number {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Number(*self)
    }
}

impl DomainReadable for Number {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Number(n) => Ok(n),
            other => Err(MapperError::KindMismatch {
                expected: "a number",
                actual: other.kind(),
            }),
        }
    }
}

macro_rules! writable_int {
    ($($ty:ty),*) => {
        $(
            impl DomainWritable for $ty {
                fn as_domain(&self) -> DomainValue {
                    DomainValue::Number(Number::from(*self))
                }
            }
        )*
    };
}

writable_int!(i32, i64, u32, u64, f64);

impl DomainReadable for i64 {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        Number::try_from_domain(value)?
            .as_i64()
            .ok_or(MapperError::KindMismatch {
                expected: "a signed integer",
                actual: "number",
            })
    }
}

impl DomainReadable for i32 {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        i64::try_from_domain(value)?
            .try_into()
            .map_err(|_| MapperError::KindMismatch {
                expected: "a 32 bit integer",
                actual: "number",
            })
    }
}

impl DomainReadable for u64 {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        Number::try_from_domain(value)?
            .as_u64()
            .ok_or(MapperError::KindMismatch {
                expected: "an unsigned integer",
                actual: "number",
            })
    }
}

impl DomainReadable for u32 {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        u64::try_from_domain(value)?
            .try_into()
            .map_err(|_| MapperError::KindMismatch {
                expected: "a 32 bit unsigned integer",
                actual: "number",
            })
    }
}

impl DomainReadable for f64 {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        Ok(Number::try_from_domain(value)?.as_f64())
    }
}

impl DomainWritable for Blob {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Binary(self.clone())
    }

    fn into_domain(self) -> DomainValue {
        DomainValue::Binary(self)
    }
}

impl DomainReadable for Blob {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Binary(blob) => Ok(blob),
            other => Err(MapperError::KindMismatch {
                expected: "binary data",
                actual: other.kind(),
            }),
        }
    }
}

impl DomainWritable for Timestamp {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Timestamp(*self)
    }
}

impl DomainReadable for Timestamp {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Timestamp(ts) => Ok(ts),
            DomainValue::String(text) => Ok(Timestamp::parse(&text)?),
            other => Err(MapperError::KindMismatch {
                expected: "a timestamp",
                actual: other.kind(),
            }),
        }
    }
}

impl<T: DomainWritable> DomainWritable for Option<T> {
    fn as_domain(&self) -> DomainValue {
        match self {
            Some(value) => value.as_domain(),
            None => DomainValue::Null,
        }
    }

    fn into_domain(self) -> DomainValue {
        match self {
            Some(value) => value.into_domain(),
            None => DomainValue::Null,
        }
    }
}

impl<T: DomainReadable> DomainReadable for Option<T> {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Null => Ok(None),
            other => Ok(Some(T::try_from_domain(other)?)),
        }
    }
}

impl<T: DomainWritable> DomainWritable for Vec<T> {
    fn as_domain(&self) -> DomainValue {
        DomainValue::List(self.iter().map(DomainWritable::as_domain).collect())
    }

    fn into_domain(self) -> DomainValue {
        DomainValue::List(
            self.into_iter()
                .map(DomainWritable::into_domain)
                .collect(),
        )
    }
}

impl<T: DomainReadable> DomainReadable for Vec<T> {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        let elements = match value {
            DomainValue::List(items) => items,
            DomainValue::Set(set) => set.into_elements(),
            other => {
                return Err(MapperError::KindMismatch {
                    expected: "a sequence",
                    actual: other.kind(),
                })
            }
        };
        elements.into_iter().map(T::try_from_domain).collect()
    }
}

impl DomainWritable for DomainSet {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Set(self.clone())
    }

    fn into_domain(self) -> DomainValue {
        DomainValue::Set(self)
    }
}

impl DomainReadable for DomainSet {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        match value {
            DomainValue::Set(set) => Ok(set),
            other => Err(MapperError::KindMismatch {
                expected: "a set",
                actual: other.kind(),
            }),
        }
    }
}

impl DomainWritable for DomainObject {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Object(self.clone())
    }

    fn into_domain(self) -> DomainValue {
        DomainValue::Object(self)
    }
}

impl DomainReadable for DomainObject {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        value.into_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_deduplicate_and_keep_insertion_order() {
        let mut set = DomainSet::new();
        assert!(set.insert(DomainValue::text("foo")));
        assert!(set.insert(DomainValue::text("bar")));
        assert!(!set.insert(DomainValue::text("foo")));
        assert_eq!(
            set.elements(),
            &[DomainValue::text("foo"), DomainValue::text("bar")]
        );
    }

    #[test]
    fn set_equality_ignores_order() {
        let a: DomainSet = vec![DomainValue::text("foo"), DomainValue::text("bar")]
            .into_iter()
            .collect();
        let b: DomainSet = vec![DomainValue::text("bar"), DomainValue::text("foo")]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn object_fields_replace_on_reinsert() {
        let mut object = DomainObject::new();
        object.insert("name", DomainValue::text("foo"));
        object.insert("name", DomainValue::text("bar"));
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("name"), Some(&DomainValue::text("bar")));
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let object = DomainObject::new()
            .with_field("name", "foo")
            .with_field_opt("nickname", None::<String>);
        assert_eq!(object.len(), 1);
        assert!(object.get("nickname").is_none());
    }

    #[test]
    fn typed_round_trip_through_traits() {
        let values = vec![1i64, 2, 3];
        let domain = values.clone().into_domain();
        assert_eq!(Vec::<i64>::try_from_domain(domain), Ok(values));

        assert_eq!(
            Option::<String>::try_from_domain(DomainValue::Null),
            Ok(None)
        );
        assert_eq!(
            i32::try_from_domain(DomainValue::number(56i64)),
            Ok(56)
        );
        assert!(bool::try_from_domain(DomainValue::text("no")).is_err());
    }
}
