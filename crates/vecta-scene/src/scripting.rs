//! Named-property access for a scripting collaborator. Writes are routed
//! through [`SetProperty`] so scripted edits stay undoable.

use crate::command::{Outcome, SetProperty};
use crate::editor::Editor;
use crate::error::{SceneError, SceneResult};
use crate::owner::OwnerId;
use crate::value::{PropertyKind, Value};

/// Closest kind for a bare JSON value, for error reporting.
fn json_kind(json: &serde_json::Value) -> PropertyKind {
    use serde_json::Value as J;
    match json {
        J::Bool(_) => PropertyKind::Bool,
        J::Number(n) if n.is_i64() || n.is_u64() => PropertyKind::Integer,
        J::Number(_) => PropertyKind::Float,
        J::String(_) => PropertyKind::String,
        J::Array(_) => PropertyKind::FloatVector,
        J::Null | J::Object(_) => PropertyKind::Reference,
    }
}

impl Editor {
    /// Effective value at the current frame.
    pub fn get_property(&self, owner: OwnerId, name: &str) -> SceneResult<Value> {
        self.document().value(owner, name)
    }

    pub fn get_property_json(&self, owner: OwnerId, name: &str) -> SceneResult<serde_json::Value> {
        Ok(self.get_property(owner, name)?.to_json())
    }

    pub fn set_property(&mut self, owner: OwnerId, name: &str, value: Value) -> SceneResult<Outcome> {
        self.push(SetProperty::new(owner, name, value))
    }

    /// Like [`Editor::set_property`], reading the value in the property's natural JSON shape.
    pub fn set_property_json(
        &mut self,
        owner: OwnerId,
        name: &str,
        json: &serde_json::Value,
    ) -> SceneResult<Outcome> {
        let kind = self.document().property(owner, name)?.kind();
        let value = Value::from_json(kind, json).ok_or_else(|| SceneError::TypeMismatch {
            property: name.to_string(),
            expected: kind,
            found: json_kind(json),
        })?;
        self.set_property(owner, name, value)
    }

    pub fn find_owner(&self, name: &str) -> Option<OwnerId> {
        self.document().find_by_name(name)
    }
}
