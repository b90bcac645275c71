//! Entity payloads and the small typed views the adapter needs over them.
//!
//! Entities flow through this crate verbatim: the platform owns their shape,
//! and callers get the raw JSON back. The adapter itself only ever reads the
//! assigned identifier, the sync token, and the metadata timestamps.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Numeric identifier assigned by the platform.
///
/// The wire representation is a string of digits inside the entity payload;
/// this newtype is the parsed form used across the adapter surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Opaque platform entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Value);

impl Entity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Identifier assigned by the platform, if the payload carries one.
    ///
    /// Accepts both the wire form (string of digits) and a bare number.
    pub fn id(&self) -> Option<EntityId> {
        match self.0.get("Id") {
            Some(Value::String(raw)) => raw.trim().parse().ok().map(EntityId::new),
            Some(Value::Number(number)) => number.as_i64().map(EntityId::new),
            _ => None,
        }
    }

    /// Optimistic-concurrency token carried by mutable entities.
    pub fn sync_token(&self) -> Option<&str> {
        self.0.get("SyncToken")?.as_str()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.metadata_time("CreateTime")
    }

    pub fn last_updated_at(&self) -> Option<OffsetDateTime> {
        self.metadata_time("LastUpdatedTime")
    }

    fn metadata_time(&self, field: &str) -> Option<OffsetDateTime> {
        let raw = self.0.get("MetaData")?.get(field)?.as_str()?;
        OffsetDateTime::parse(raw, &Rfc3339).ok()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Insertion-ordered attribute mapping used for create/update payloads and
/// equality filters.
///
/// Order is preserved because filter-clause rendering is order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets an attribute, overwriting an existing entry in place so insertion
    /// order stays stable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

/// Ordered query result set returned verbatim from the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCollection {
    entities: Vec<Entity>,
}

impl EntityCollection {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn first(&self) -> Option<&Entity> {
        self.entities.first()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.entities
    }
}

impl IntoIterator for EntityCollection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_identifier_from_wire_string() {
        let entity = Entity::new(json!({"Id": "512", "Name": "Consulting"}));
        assert_eq!(entity.id(), Some(EntityId::new(512)));
    }

    #[test]
    fn reads_identifier_from_bare_number() {
        let entity = Entity::new(json!({"Id": 7}));
        assert_eq!(entity.id(), Some(EntityId::new(7)));
    }

    #[test]
    fn missing_or_malformed_identifier_is_absent() {
        assert_eq!(Entity::new(json!({"Name": "x"})).id(), None);
        assert_eq!(Entity::new(json!({"Id": "abc"})).id(), None);
        assert_eq!(Entity::new(json!("bare string")).id(), None);
    }

    #[test]
    fn reads_metadata_timestamps() {
        let entity = Entity::new(json!({
            "Id": "3",
            "MetaData": {
                "CreateTime": "2024-03-01T09:30:00Z",
                "LastUpdatedTime": "2024-03-02T10:00:00Z"
            }
        }));

        let created = entity.created_at().expect("create time should parse");
        let updated = entity.last_updated_at().expect("update time should parse");
        assert!(created < updated);
    }

    #[test]
    fn unparsable_metadata_timestamp_is_absent() {
        let entity = Entity::new(json!({"MetaData": {"CreateTime": "yesterday"}}));
        assert_eq!(entity.created_at(), None);
    }

    #[test]
    fn attributes_preserve_insertion_order() {
        let attributes = Attributes::new()
            .with("b", "second")
            .with("a", "first")
            .with("c", "third");

        let names = attributes.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn setting_existing_attribute_overwrites_in_place() {
        let mut attributes = Attributes::new().with("Name", "Old").with("Active", true);
        attributes.set("Name", "New");

        let names = attributes.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Name", "Active"]);
        assert_eq!(attributes.get("Name"), Some(&json!("New")));
    }

    #[test]
    fn collection_preserves_platform_order() {
        let collection = EntityCollection::new(vec![
            Entity::new(json!({"Id": "2"})),
            Entity::new(json!({"Id": "1"})),
        ]);

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.first().and_then(Entity::id),
            Some(EntityId::new(2))
        );
    }
}
