//! The "create creative automated version" form.
//!
//! The `type` field selects the mode. `count` is asked for the simple and
//! radical modes, `headline` and `visual` for the medium mode, and the
//! `blocks` section for the format mode.

use crate::form::FormDefinition;
use crate::layout::{Layout, LayoutNode, VisibilityRule};
use crate::schema::FieldDefinition;

pub const ENDPOINT_PATH: &str = "/creative/create-version";

pub const CREATIVE_SOURCE: &str = "Creative process";
pub const BLOCK_SOURCE: &str = "Blocks";

pub const VERSION_TYPES: [&str; 4] = ["simple", "medium", "radical", "format"];

pub fn fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::fixed_enum("type", &VERSION_TYPES),
        FieldDefinition::choice_list("createdBy", CREATIVE_SOURCE, "Created By"),
        FieldDefinition::integer("count").with_maximum(100.0),
        FieldDefinition::string("headline"),
        FieldDefinition::integer("visual").with_maximum(100.0),
        FieldDefinition::array(
            "blocks",
            vec![
                FieldDefinition::fixed_enum("name", &["Visual"]),
                FieldDefinition::fixed_enum("attribute", &["Format"]),
                FieldDefinition::choice_list("category", BLOCK_SOURCE, "Category"),
                FieldDefinition::record_attribute("parameter", BLOCK_SOURCE, "Parameter"),
            ],
        ),
    ]
}

pub fn layout() -> Layout {
    Layout::vertical(vec![
        LayoutNode::field("type").with_label("Version type"),
        LayoutNode::field("createdBy").with_label("Initials of the Creative Marketing Specialist"),
        LayoutNode::field("count")
            .with_label("Number of technical tasks")
            .with_rule(VisibilityRule::hide_when("type", &["medium", "format"])),
        LayoutNode::field("headline")
            .with_label("Headline")
            .with_rule(VisibilityRule::show_when("type", &["medium"])),
        LayoutNode::field("visual")
            .with_label("Visual")
            .with_rule(VisibilityRule::show_when("type", &["medium"])),
        LayoutNode::group("section:blocks", vec![LayoutNode::field("blocks")])
            .with_rule(VisibilityRule::show_when("type", &["format"])),
    ])
}

pub fn creative_version() -> FormDefinition {
    FormDefinition {
        name: "create-creative-automated-version".to_string(),
        fields: fields(),
        layout: layout(),
        endpoint_path: ENDPOINT_PATH.to_string(),
    }
}
