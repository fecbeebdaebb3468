use crate::document::Document;
use crate::error::{SceneError, SceneResult};
use crate::owner::OwnerId;
use crate::value::Value;

use super::{Command, Outcome};

/// Assign one value to the same property on one or more owners.
///
/// The stored static value is written; a track on the property keeps
/// governing the effective value at keyed frames.
pub struct SetProperty {
    targets: Vec<OwnerId>,
    property: String,
    value: Value,
    previous: Vec<(OwnerId, Value)>,
}

impl SetProperty {
    pub fn new(target: OwnerId, property: impl Into<String>, value: Value) -> Self {
        Self::on_many(vec![target], property, value)
    }

    pub fn on_many(targets: Vec<OwnerId>, property: impl Into<String>, value: Value) -> Self {
        let mut targets = targets;
        let mut seen = std::collections::BTreeSet::new();
        targets.retain(|t| seen.insert(*t));
        Self {
            targets,
            property: property.into(),
            value,
            previous: Vec::new(),
        }
    }

    /// Kind-check, clamp and reference-check the value for every target.
    fn prepare(&self, doc: &Document) -> SceneResult<Vec<(OwnerId, Value, Value)>> {
        self.targets
            .iter()
            .map(|&owner| {
                let prop = doc.property(owner, &self.property)?;
                let value = prop.coerce(self.value.clone())?;
                if let Value::Reference(Some(target)) = value {
                    let allowed = doc
                        .owners
                        .get(&target)
                        .map(|t| prop.constraints().allows_category(t.kind().category()))
                        .unwrap_or(false);
                    if !allowed {
                        return Err(SceneError::InvalidReference {
                            property: self.property.clone(),
                            target,
                        });
                    }
                }
                Ok((owner, prop.value().clone(), value))
            })
            .collect()
    }
}

impl Command for SetProperty {
    fn label(&self) -> String {
        match self.targets.len() {
            1 => format!("Set {}", self.property),
            n => format!("Set {} on {} owners", self.property, n),
        }
    }

    fn apply(&mut self, doc: &mut Document) -> SceneResult<Outcome> {
        let plan = self.prepare(doc)?;
        if plan.iter().all(|(_, old, new)| old == new) {
            return Ok(Outcome::NoOp);
        }
        self.previous.clear();
        for (owner, old, new) in plan {
            doc.property_mut(owner, &self.property)?.restore(new);
            self.previous.push((owner, old));
        }
        Ok(Outcome::Changed)
    }

    fn revert(&mut self, doc: &mut Document) -> SceneResult<()> {
        for (owner, old) in self.previous.iter().rev() {
            doc.property_mut(*owner, &self.property)?.restore(old.clone());
        }
        Ok(())
    }
}
