use serde::{Deserialize, Serialize};

use crate::path::PathGeometry;
use crate::property::Property;

/// Stable identifier of a property owner within a document. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Empty,
    Ellipse,
    Rectangle,
    Path,
}

impl ObjectType {
    /// Whether the object can be replaced by an equivalent path.
    pub fn is_convertible(self) -> bool {
        matches!(self, ObjectType::Ellipse | ObjectType::Rectangle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    /// Assigns a style to its object.
    Style,
    /// Places its object along a referenced path.
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "type", rename_all = "snake_case")]
pub enum OwnerKind {
    Object(ObjectType),
    Tag(TagType),
    Style,
    Tool(ToolType),
}

/// Coarse owner classification used by reference filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerCategory {
    Object,
    Tag,
    Style,
    Tool,
}

impl OwnerKind {
    pub fn category(&self) -> OwnerCategory {
        match self {
            OwnerKind::Object(_) => OwnerCategory::Object,
            OwnerKind::Tag(_) => OwnerCategory::Tag,
            OwnerKind::Style => OwnerCategory::Style,
            OwnerKind::Tool(_) => OwnerCategory::Tool,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, OwnerKind::Object(_))
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, OwnerKind::Tag(_))
    }

    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            OwnerKind::Object(t) => Some(*t),
            _ => None,
        }
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerKind::Object(t) => write!(f, "object/{:?}", t),
            OwnerKind::Tag(t) => write!(f, "tag/{:?}", t),
            OwnerKind::Style => write!(f, "style"),
            OwnerKind::Tool(t) => write!(f, "tool/{:?}", t),
        }
    }
}

/// Any entity holding named properties: objects, tags, styles and tools.
///
/// Objects own their `children` (objects) and `tags` exclusively; `parent`
/// is a plain id looked up through the document, never a pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOwner {
    pub(crate) id: OwnerId,
    pub(crate) kind: OwnerKind,
    pub(crate) properties: Vec<Property>,
    #[serde(default)]
    pub(crate) parent: Option<OwnerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<OwnerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) tags: Vec<OwnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) geometry: Option<PathGeometry>,
}

impl PropertyOwner {
    pub(crate) fn new(id: OwnerId, kind: OwnerKind, properties: Vec<Property>) -> Self {
        let geometry = match kind {
            OwnerKind::Object(ObjectType::Path) => Some(PathGeometry::default()),
            _ => None,
        };
        Self {
            id,
            kind,
            properties,
            parent: None,
            children: Vec::new(),
            tags: Vec::new(),
            geometry,
        }
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn kind(&self) -> OwnerKind {
        self.kind
    }

    pub fn parent(&self) -> Option<OwnerId> {
        self.parent
    }

    pub fn children(&self) -> &[OwnerId] {
        &self.children
    }

    pub fn tags(&self) -> &[OwnerId] {
        &self.tags
    }

    pub fn geometry(&self) -> Option<&PathGeometry> {
        self.geometry.as_ref()
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub(crate) fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// The `name` property, if the owner has one.
    pub fn name(&self) -> Option<&str> {
        self.property("name").and_then(|p| p.value().as_str())
    }

    /// Builder: override the initial `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        if let Some(p) = self.property_mut("name") {
            p.restore(crate::value::Value::String(name.into()));
        }
        self
    }

    /// Builder: override an initial property value (kind-checked and clamped).
    pub fn with_value(
        mut self,
        name: &str,
        value: crate::value::Value,
    ) -> crate::error::SceneResult<Self> {
        let id = self.id;
        let p = self
            .property_mut(name)
            .ok_or_else(|| crate::error::SceneError::UnknownProperty {
                owner: id,
                property: name.to_string(),
            })?;
        p.set(value)?;
        Ok(self)
    }

    /// Builder: initial geometry of a path object.
    pub fn with_geometry(mut self, geometry: PathGeometry) -> Self {
        if self.geometry.is_some() {
            self.geometry = Some(geometry);
        }
        self
    }
}
