//! Export of a synthesized [`Schema`] in JSON Schema form, the shape the host
//! form renderer consumes.

use super::field::{FieldKind, FieldSpec, ItemSchema, Schema};
use serde_json::{Map, Value, json};

impl Schema {
    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": properties(&self.fields),
        })
    }
}

fn properties(fields: &[FieldSpec]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|f| (f.name.clone(), field_schema(f)))
        .collect();
    Value::Object(map)
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut out = Map::new();
    let type_name = match field.kind {
        FieldKind::String | FieldKind::Enum => "string",
        FieldKind::Integer => "integer",
        FieldKind::Array => "array",
    };
    out.insert("type".to_string(), json!(type_name));
    if let Some(choices) = &field.enumeration {
        out.insert("enum".to_string(), json!(choices));
    }
    if let Some(maximum) = field.maximum {
        out.insert("maximum".to_string(), json!(maximum));
    }
    if let Some(items) = &field.items {
        out.insert("items".to_string(), item_schema(items));
    }
    Value::Object(out)
}

fn item_schema(items: &ItemSchema) -> Value {
    json!({
        "type": "object",
        "properties": properties(&items.properties),
        "required": items.required,
    })
}
