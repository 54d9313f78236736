//! Named collections of rules.
//!
//! A [`Schema`] maps field names to [`Rule`]s and remembers insertion order,
//! which is the order fields are evaluated in (and the order they appear in
//! when serialized).

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Rule;

/// Insertion-ordered mapping from field name to rule.
///
/// # Examples
///
/// ```
/// use rule_schema_core::{NumberRule, Rule, Schema, StringRule};
///
/// let schema = Schema::new()
///     .with_field("name", Rule::string(StringRule::new()).required())
///     .with_field("age", Rule::number(NumberRule::new().integer()));
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), ["name", "age"]);
/// assert!(schema.get("age").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<(String, Rule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field.
    ///
    /// Replacing an existing field keeps its original position and returns
    /// the previous rule.
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, rule)),
            None => {
                self.fields.push((name, rule));
                None
            }
        }
    }

    /// Builder form of [`insert`](Schema::insert).
    pub fn with_field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Rule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Rule)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, rule) in iter {
            schema.insert(name, rule);
        }
        schema
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a str, &'a Rule);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Rule)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, rule) in &self.fields {
            map.serialize_entry(name, rule)?;
        }
        map.end()
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schema, A::Error> {
        let mut schema = Schema::new();
        while let Some((name, rule)) = access.next_entry::<String, Rule>()? {
            schema.insert(name, rule);
        }
        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}
