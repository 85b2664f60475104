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

//! End to end mapping of a realistic model hierarchy.

use dynomap_mapper::condition::{Condition, ExpressionParams};
use dynomap_mapper::schema::{AttrType, CustomMapper, ModelSchema, PropertySchema};
use dynomap_mapper::{
    from_db, from_db_one, to_db, to_db_one, DomainObject, DomainReadable, DomainSet, DomainValue,
    DomainWritable, MappedModel, MapperError, SchemaRegistry,
};
use dynomap_model::{AttrValue, AttributeMap, Blob, Timestamp};

/// A composite id stored as a single zero padded string, `counter` first.
#[derive(Clone, Debug, PartialEq)]
struct MembershipId {
    counter: u32,
    year: u32,
}

fn membership_id_to_db(value: DomainValue) -> Result<AttrValue, MapperError> {
    let mut object = value.into_object()?;
    let counter = u32::try_from_domain(object.take_required("counter")?)?;
    let year = u32::try_from_domain(object.take_required("year")?)?;
    Ok(AttrValue::text(format!("{:04}{:04}", counter, year)))
}

fn membership_id_from_db(attr: AttrValue) -> Result<DomainValue, MapperError> {
    let text = attr.as_str().ok_or(MapperError::KindMismatch {
        expected: "a zero padded id string",
        actual: attr.tag(),
    })?;
    let parse = |part: &str| {
        part.parse::<u32>().map_err(|_| MapperError::KindMismatch {
            expected: "a zero padded id string",
            actual: "string",
        })
    };
    if text.len() != 8 {
        return Err(MapperError::KindMismatch {
            expected: "a zero padded id string",
            actual: "string",
        });
    }
    Ok(DomainValue::Object(
        DomainObject::new()
            .with_field("counter", parse(&text[..4])?)
            .with_field("year", parse(&text[4..])?),
    ))
}

const MEMBERSHIP_ID_MAPPER: CustomMapper = CustomMapper {
    to_db: membership_id_to_db,
    from_db: membership_id_from_db,
};

impl DomainWritable for MembershipId {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Object(
            DomainObject::new()
                .with_field("counter", self.counter)
                .with_field("year", self.year),
        )
    }
}

impl DomainReadable for MembershipId {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        let mut object = value.into_object()?;
        Ok(MembershipId {
            counter: u32::try_from_domain(object.take_required("counter")?)?,
            year: u32::try_from_domain(object.take_required("year")?)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    name: String,
    age: i64,
    created_at: Timestamp,
}

impl DomainWritable for Employee {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Object(
            DomainObject::for_model(Self::MODEL_NAME)
                .with_field("name", self.name.as_str())
                .with_field("age", self.age)
                .with_field("createdAt", self.created_at),
        )
    }
}

impl DomainReadable for Employee {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        let mut object = value.into_object()?;
        Ok(Employee {
            name: String::try_from_domain(object.take_required("name")?)?,
            age: i64::try_from_domain(object.take_required("age")?)?,
            created_at: Timestamp::try_from_domain(object.take_required("createdAt")?)?,
        })
    }
}

impl MappedModel for Employee {
    const MODEL_NAME: &'static str = "Employee";

    fn schema() -> Result<ModelSchema, MapperError> {
        ModelSchema::builder(Self::MODEL_NAME, "employees")
            .property(PropertySchema::new("name").partition_key())
            .property(PropertySchema::new("age"))
            .property(PropertySchema::new("createdAt").of_type(AttrType::Timestamp))
            .build()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Organization {
    id: String,
    name: String,
    created_at: Timestamp,
    active: bool,
    employee_count: i64,
    /// Order matters, so duplicates and ordering survive the trip.
    domains: Vec<String>,
    security_groups: DomainSet,
    chief: Employee,
    staff: Vec<Employee>,
    membership: MembershipId,
    /// Session scratch state, never stored.
    cached_rating: Option<f64>,
}

impl DomainWritable for Organization {
    fn as_domain(&self) -> DomainValue {
        DomainValue::Object(
            DomainObject::for_model(Self::MODEL_NAME)
                .with_field("id", self.id.as_str())
                .with_field("name", self.name.as_str())
                .with_field("createdAtDate", self.created_at)
                .with_field("active", self.active)
                .with_field("employeeCount", self.employee_count)
                .with_field("domains", self.domains.clone())
                .with_field("securityGroups", self.security_groups.clone())
                .with_field("chief", self.chief.clone())
                .with_field("staff", self.staff.clone())
                .with_field("membership", self.membership.clone())
                .with_field_opt("cachedRating", self.cached_rating),
        )
    }
}

impl DomainReadable for Organization {
    fn try_from_domain(value: DomainValue) -> Result<Self, MapperError> {
        let mut object = value.into_object()?;
        Ok(Organization {
            id: String::try_from_domain(object.take_required("id")?)?,
            name: String::try_from_domain(object.take_required("name")?)?,
            created_at: Timestamp::try_from_domain(object.take_required("createdAtDate")?)?,
            active: bool::try_from_domain(object.take_required("active")?)?,
            employee_count: i64::try_from_domain(object.take_required("employeeCount")?)?,
            domains: Vec::try_from_domain(object.take_required("domains")?)?,
            security_groups: DomainSet::try_from_domain(object.take_required("securityGroups")?)?,
            chief: Employee::try_from_domain(object.take_required("chief")?)?,
            staff: Vec::try_from_domain(object.take_required("staff")?)?,
            membership: MembershipId::try_from_domain(object.take_required("membership")?)?,
            cached_rating: match object.take("cachedRating") {
                Some(value) => Option::try_from_domain(value)?,
                None => None,
            },
        })
    }
}

impl MappedModel for Organization {
    const MODEL_NAME: &'static str = "Organization";

    fn schema() -> Result<ModelSchema, MapperError> {
        ModelSchema::builder(Self::MODEL_NAME, "organizations")
            .property(PropertySchema::new("id").partition_key())
            .property(PropertySchema::new("name").gsi_partition_key("name-createdAt-index"))
            .property(
                PropertySchema::new("createdAtDate")
                    .of_type(AttrType::Timestamp)
                    .gsi_sort_key("name-createdAt-index"),
            )
            .property(PropertySchema::new("active"))
            .property(PropertySchema::new("employeeCount"))
            .property(PropertySchema::new("domains").of_type(AttrType::Array))
            .property(PropertySchema::new("securityGroups").of_type(AttrType::Set))
            .property(PropertySchema::new("chief").of_type(AttrType::Model("Employee")))
            .property(PropertySchema::new("staff").of_type(AttrType::Array))
            .property(PropertySchema::new("membership").with_mapper(MEMBERSHIP_ID_MAPPER))
            .property(PropertySchema::new("cachedRating").transient())
            .build()
    }
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .register::<Organization>()
        .unwrap()
        .register::<Employee>()
        .unwrap()
        .build()
}

fn employee(name: &str, age: i64, created_at: &str) -> Employee {
    Employee {
        name: name.to_string(),
        age,
        created_at: Timestamp::parse(created_at).unwrap(),
    }
}

fn organization() -> Organization {
    Organization {
        id: "my-orga".to_string(),
        name: "Organization".to_string(),
        created_at: Timestamp::parse("2017-05-02T00:00:00Z").unwrap(),
        active: true,
        employee_count: 3,
        domains: vec![
            "example.com".to_string(),
            "example.org".to_string(),
            "example.com".to_string(),
        ],
        security_groups: vec![DomainValue::text("sg-a"), DomainValue::text("sg-b")]
            .into_iter()
            .collect(),
        chief: employee("max", 50, "2017-03-03T00:00:00Z"),
        staff: vec![
            employee("anna", 27, "2018-06-01T12:30:00Z"),
            employee("otto", 35, "2019-01-15T08:00:00Z"),
        ],
        membership: MembershipId {
            counter: 20,
            year: 2017,
        },
        cached_rating: Some(4.5),
    }
}

#[test]
fn simple_object_maps_field_by_field() {
    let registry = SchemaRegistry::empty();
    let object = DomainObject::new()
        .with_field("name", "foo")
        .with_field("age", 56i64);
    let encoded = to_db_one(Some(&DomainValue::Object(object)), None, &registry).unwrap();
    let entries = encoded.as_map().unwrap();
    assert_eq!(entries["name"], AttrValue::text("foo"));
    assert_eq!(entries["age"], AttrValue::Number("56".to_string()));
}

#[test]
fn end_to_end_object_with_date() {
    let registry = SchemaRegistry::empty();
    let object = DomainObject::new()
        .with_field("name", "foo")
        .with_field("age", 56i64)
        .with_field("createdAt", Timestamp::parse("2017-03-03T00:00:00Z").unwrap());
    let encoded = to_db_one(Some(&DomainValue::Object(object.clone())), None, &registry).unwrap();
    assert_eq!(
        encoded.as_map().unwrap()["createdAt"],
        AttrValue::text("2017-03-03T00:00:00Z")
    );

    let decoded = from_db_one(&encoded, None, &registry).unwrap();
    assert_eq!(decoded, DomainValue::Object(object));
}

#[test]
fn organization_encodes_under_its_schema() {
    let registry = registry();
    let attrs = to_db(&organization(), &registry).unwrap();

    assert_eq!(attrs["id"], AttrValue::text("my-orga"));
    assert_eq!(attrs["createdAtDate"], AttrValue::text("2017-05-02T00:00:00Z"));
    assert_eq!(attrs["active"], AttrValue::Boolean(true));
    assert_eq!(attrs["employeeCount"], AttrValue::Number("3".to_string()));

    // The declared array keeps order and duplicates instead of a string set.
    assert_eq!(
        attrs["domains"],
        AttrValue::List(vec![
            AttrValue::text("example.com"),
            AttrValue::text("example.org"),
            AttrValue::text("example.com"),
        ])
    );
    assert_eq!(
        attrs["securityGroups"],
        AttrValue::StringSet(vec!["sg-a".to_string(), "sg-b".to_string()])
    );
    assert_eq!(
        attrs["membership"],
        AttrValue::text("00202017"),
        "custom mapper output"
    );
    assert!(!attrs.contains_key("cachedRating"), "transient must not be stored");

    let chief = attrs["chief"].as_map().unwrap();
    assert_eq!(chief["name"], AttrValue::text("max"));
    assert_eq!(chief["createdAt"], AttrValue::text("2017-03-03T00:00:00Z"));

    match &attrs["staff"] {
        AttrValue::List(items) => {
            assert_eq!(items.len(), 2);
            assert!(items.iter().all(|item| item.tag() == "M"));
        }
        other => panic!("expected staff to be a list, got {}", other),
    }
}

#[test]
fn organization_round_trips() {
    let registry = registry();
    let mut original = organization();
    let attrs = to_db(&original, &registry).unwrap();
    let revived: Organization = from_db(&attrs, &registry).unwrap();

    // Transient state does not survive the trip; everything else must.
    original.cached_rating = None;
    assert_eq!(revived, original);
}

#[test]
fn decoding_drops_attributes_without_a_property() {
    let registry = registry();
    let mut attrs = to_db(&organization(), &registry).unwrap();
    attrs.insert("legacyColumn".to_string(), AttrValue::text("stale"));
    attrs.insert("cachedRating".to_string(), AttrValue::Number("1".to_string()));

    let revived: Organization = from_db(&attrs, &registry).unwrap();
    assert_eq!(revived.cached_rating, None);
}

#[test]
fn heterogeneous_values_stay_a_list_end_to_end() {
    let registry = SchemaRegistry::empty();
    let value = DomainValue::List(vec![
        DomainValue::text("sample"),
        DomainValue::number(26i64),
        DomainValue::Boolean(true),
    ]);
    let encoded = to_db_one(Some(&value), None, &registry).unwrap();
    assert_eq!(
        encoded,
        AttrValue::List(vec![
            AttrValue::text("sample"),
            AttrValue::Number("26".to_string()),
            AttrValue::Boolean(true),
        ])
    );
    assert_eq!(from_db_one(&encoded, None, &registry).unwrap(), value);
}

#[test]
fn binary_buffers_round_trip_as_sets_and_scalars() {
    let registry = SchemaRegistry::empty();
    let blob = |data: &[u8]| DomainValue::Binary(Blob::from_vec(data.to_vec()));

    let scalar = blob(b"\x00\x01\x02");
    let encoded = to_db_one(Some(&scalar), None, &registry).unwrap();
    assert_eq!(encoded, AttrValue::Binary(Blob::from_vec(vec![0, 1, 2])));
    assert_eq!(from_db_one(&encoded, None, &registry).unwrap(), scalar);

    let set: DomainSet = vec![blob(b"one"), blob(b"two")].into_iter().collect();
    let encoded = to_db_one(Some(&DomainValue::Set(set.clone())), None, &registry).unwrap();
    assert_eq!(
        encoded,
        AttrValue::BinarySet(vec![Blob::from_vec(b"one".to_vec()), Blob::from_vec(b"two".to_vec())])
    );
    assert_eq!(
        from_db_one(&encoded, None, &registry).unwrap(),
        DomainValue::Set(set)
    );
}

#[test]
fn key_condition_literals_use_schema_metadata() {
    let registry = registry();
    let created_at = registry.resolve_property("Organization", "createdAtDate");
    let condition = Condition::attribute_equals(
        "createdAtDate",
        &DomainValue::Timestamp(Timestamp::parse("2017-05-02T02:00:00+02:00").unwrap()),
        0,
        created_at,
        &registry,
    )
    .unwrap();
    assert_eq!(
        condition.attribute_values().get(":createdAtDate_0"),
        Some(&AttrValue::text("2017-05-02T00:00:00Z"))
    );

    let mut params = ExpressionParams::new();
    params.add_key_condition(
        Condition::attribute_equals("id", &DomainValue::text("my-orga"), 1, None, &registry)
            .unwrap(),
    );
    params.add_key_condition(condition);
    assert_eq!(
        params.key_condition_expression.as_deref(),
        Some("#id_1 = :id_1 AND (#createdAtDate_0 = :createdAtDate_0)")
    );
}

#[test]
fn custom_mapper_applies_in_both_directions() {
    let registry = registry();
    let meta = registry.resolve_property("Organization", "membership");

    let encoded = to_db_one(
        Some(&MembershipId { counter: 20, year: 2017 }.into_domain()),
        meta,
        &registry,
    )
    .unwrap();
    assert_eq!(encoded, AttrValue::text("00202017"));

    let decoded = from_db_one(&AttrValue::text("00202017"), meta, &registry).unwrap();
    assert_eq!(
        MembershipId::try_from_domain(decoded),
        Ok(MembershipId { counter: 20, year: 2017 })
    );
}

#[test]
fn stored_record_decodes_without_optional_attributes() {
    let registry = registry();
    let mut attrs = AttributeMap::new();
    attrs.insert("name".to_string(), AttrValue::text("max"));
    attrs.insert("age".to_string(), AttrValue::Number("50".to_string()));
    attrs.insert(
        "createdAt".to_string(),
        AttrValue::text("2017-03-03T00:00:00Z"),
    );
    let revived: Employee = from_db(&attrs, &registry).unwrap();
    assert_eq!(revived, employee("max", 50, "2017-03-03T00:00:00Z"));

    attrs.remove("age");
    assert_eq!(
        from_db::<Employee>(&attrs, &registry),
        Err(MapperError::MissingField { field: "age" })
    );
}
