use crate::error::DataError;
use crate::source::{ReferenceCatalog, ReferenceSource};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

/// One record of a reference table, matching the snapshot JSON format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// An in-memory reference table: configured choice lists plus live records.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    #[serde(default)]
    pub choices: AHashMap<String, Vec<String>>,
    /// Attribute names every record may carry, even when no record holds a value yet.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub records: Vec<ReferenceRecord>,
}

impl ReferenceTable {
    pub fn with_choices(mut self, field: &str, choices: &[&str]) -> Self {
        self.choices.insert(
            field.to_string(),
            choices.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn with_record(mut self, id: &str, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.records.push(ReferenceRecord {
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.push(attribute.to_string());
        self
    }

    fn knows_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
            || self.records.iter().any(|r| r.fields.contains_key(attribute))
    }
}

impl ReferenceSource for ReferenceTable {
    fn choice_list(&self, field: &str) -> Option<Vec<String>> {
        self.choices.get(field).cloned()
    }

    fn distinct_values(&self, attribute: &str) -> Option<Vec<Value>> {
        if !self.knows_attribute(attribute) {
            return None;
        }
        Some(
            self.records
                .iter()
                .filter_map(|r| r.fields.get(attribute).cloned())
                .collect(),
        )
    }
}

/// A point-in-time copy of all reference tables, loadable from JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReferenceSnapshot {
    #[serde(default)]
    pub sources: AHashMap<String, ReferenceTable>,
}

impl ReferenceSnapshot {
    /// Load a reference snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DataError> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_table(mut self, name: &str, table: ReferenceTable) -> Self {
        self.sources.insert(name.to_string(), table);
        self
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut ReferenceTable> {
        self.sources.get_mut(name)
    }

    /// Borrow every table as a named reference source.
    pub fn catalog(&self) -> ReferenceCatalog<'_> {
        let mut catalog = ReferenceCatalog::new();
        for (name, table) in &self.sources {
            catalog.insert(name, table);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = ReferenceSnapshot::from_json(
            r#"{"sources": {"Blocks": {
                "choices": {"Category": ["Format", "Color"]},
                "records": [{"id": "rec1", "fields": {"Parameter": "Size"}}]
            }}}"#,
        )
        .unwrap();
        let blocks = &snapshot.sources["Blocks"];
        assert_eq!(
            blocks.choice_list("Category"),
            Some(vec!["Format".to_string(), "Color".to_string()])
        );
        assert_eq!(blocks.distinct_values("Parameter"), Some(vec![json!("Size")]));
        assert_eq!(blocks.distinct_values("Missing"), None);
    }

    #[test]
    fn test_declared_attribute_without_values() {
        let table = ReferenceTable::default().with_attribute("Parameter");
        assert_eq!(table.distinct_values("Parameter"), Some(vec![]));
    }
}
