//! Default property sets for every owner kind.

use vecta_core::{Color, PathConfig, Point2D};

use crate::document::Document;
use crate::owner::{ObjectType, OwnerCategory, OwnerId, OwnerKind, PropertyOwner, TagType, ToolType};
use crate::property::Property;

fn object_properties(object_type: ObjectType, paths: &PathConfig) -> Vec<Property> {
    let name = match object_type {
        ObjectType::Empty => "Empty",
        ObjectType::Ellipse => "Ellipse",
        ObjectType::Rectangle => "Rectangle",
        ObjectType::Path => "Path",
    };
    let mut props = vec![
        Property::string("name", name),
        Property::bool("visible", true),
        Property::float_vector("position", Point2D::zero()),
        Property::float("rotation", 0.0),
        Property::float_vector("scale", Point2D::new(1.0, 1.0)),
    ];
    match object_type {
        ObjectType::Empty | ObjectType::Path => {}
        ObjectType::Ellipse => {
            props.push(Property::float("radius", 100.0).with_bounds(0.0, 1000.0));
            props.push(Property::integer("segments", paths.ellipse_segments).with_bounds(3.0, 256.0));
        }
        ObjectType::Rectangle => {
            props.push(Property::float_vector("size", Point2D::new(200.0, 100.0)).with_min(0.0));
        }
    }
    props
}

fn tag_properties(tag_type: TagType) -> Vec<Property> {
    match tag_type {
        TagType::Style => vec![
            Property::string("name", "Style Tag"),
            Property::reference("style", &[OwnerCategory::Style]),
        ],
        TagType::Path => vec![
            Property::string("name", "Path Tag"),
            Property::reference("path", &[OwnerCategory::Object]),
            Property::float("t", 0.0).with_bounds(0.0, 1.0).with_step(0.01),
            Property::bool("align", false),
        ],
    }
}

fn style_properties() -> Vec<Property> {
    vec![
        Property::string("name", "Style"),
        Property::color("pen_color", Color::BLACK),
        Property::float("pen_width", 1.0).with_bounds(0.0, 100.0).with_step(0.1),
        Property::options("pen_style", &["solid", "dashed", "dotted"], 0),
        Property::color("brush_color", Color::WHITE),
        Property::bool("fill", true),
    ]
}

fn tool_properties(tool_type: ToolType) -> Vec<Property> {
    match tool_type {
        ToolType::Select => vec![
            Property::string("name", "Select"),
            Property::options("mode", &["objects", "points"], 0),
            Property::bool("snap", false),
            Property::integer_vector("grid", [10, 10]).with_bounds(1.0, 1000.0),
            Property::trigger("reset"),
        ],
    }
}

/// Default properties for an owner of `kind`.
pub fn default_properties(kind: OwnerKind, paths: &PathConfig) -> Vec<Property> {
    match kind {
        OwnerKind::Object(t) => object_properties(t, paths),
        OwnerKind::Tag(t) => tag_properties(t),
        OwnerKind::Style => style_properties(),
        OwnerKind::Tool(t) => tool_properties(t),
    }
}

impl Document {
    /// Build a detached owner with a fresh id. It enters the document once an
    /// [`AddOwners`](crate::command::AddOwners) command inserts it.
    pub fn create_owner(&mut self, kind: OwnerKind) -> PropertyOwner {
        let id = self.allocate_id();
        self.build_owner(id, kind)
    }

    pub(crate) fn build_owner(&self, id: OwnerId, kind: OwnerKind) -> PropertyOwner {
        PropertyOwner::new(id, kind, default_properties(kind, self.path_config()))
    }

    pub fn create_object(&mut self, object_type: ObjectType) -> PropertyOwner {
        self.create_owner(OwnerKind::Object(object_type))
    }

    pub fn create_tag(&mut self, tag_type: TagType) -> PropertyOwner {
        self.create_owner(OwnerKind::Tag(tag_type))
    }

    pub fn create_style(&mut self) -> PropertyOwner {
        self.create_owner(OwnerKind::Style)
    }

    pub fn create_tool(&mut self, tool_type: ToolType) -> PropertyOwner {
        self.create_owner(OwnerKind::Tool(tool_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{PropertyKind, Value};
    use std::collections::BTreeSet;
    use vecta_core::EditorConfig;

    #[test]
    fn test_every_kind_is_represented() {
        let paths = PathConfig::default();
        let kinds = [
            OwnerKind::Object(ObjectType::Ellipse),
            OwnerKind::Object(ObjectType::Rectangle),
            OwnerKind::Tag(TagType::Style),
            OwnerKind::Tag(TagType::Path),
            OwnerKind::Style,
            OwnerKind::Tool(ToolType::Select),
        ];
        let seen: BTreeSet<String> = kinds
            .iter()
            .flat_map(|k| default_properties(*k, &paths))
            .map(|p| p.kind().to_string())
            .collect();
        for kind in PropertyKind::ALL {
            assert!(seen.contains(&kind.to_string()), "missing {}", kind);
        }
    }

    #[test]
    fn test_ellipse_segments_follow_config() {
        let mut config = EditorConfig::default();
        config.paths.ellipse_segments = 8;
        let mut doc = Document::new(&config);
        let ellipse = doc.create_object(ObjectType::Ellipse);
        assert_eq!(ellipse.property("segments").unwrap().value(), &Value::Integer(8));
    }

    #[test]
    fn test_ids_are_fresh() {
        let mut doc = Document::new(&EditorConfig::default());
        let a = doc.create_style();
        let b = doc.create_style();
        assert_ne!(a.id(), b.id());
        assert!(!doc.contains(a.id()));
    }
}
