#![forbid(unsafe_code)]

//! Step descriptors and the immutable, ordered step registry.
//!
//! A [`StepRegistry`] is the tour's script. Order defines progression order,
//! and the registry is frozen once built: there is no API to insert, remove
//! or reorder steps afterwards.

use std::collections::HashSet;
use std::fmt;

/// Stable identifier of a step within a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier attribute value a host element exposes so the tour can find it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One unit of the tour's script, optionally bound to a target element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub id: StepId,
    /// Element this step points at. `None` renders a centered card.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<TargetId>,
    pub headline: String,
    pub body: String,
    /// Short instruction for the interaction that unlocks the step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_hint: Option<String>,
}

impl Step {
    /// Create an untargeted step.
    pub fn new(
        id: impl Into<String>,
        headline: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: StepId::new(id),
            target: None,
            headline: headline.into(),
            body: body.into(),
            action_hint: None,
        }
    }

    /// Bind the step to a target element.
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(TargetId::new(target));
        self
    }

    /// Attach an action hint.
    #[must_use]
    pub fn action_hint(mut self, hint: impl Into<String>) -> Self {
        self.action_hint = Some(hint.into());
        self
    }

    /// Whether the step is gated on an interaction with a target.
    #[inline]
    pub fn is_targeted(&self) -> bool {
        self.target.is_some()
    }
}

/// Errors raised while building a registry.
#[derive(Debug)]
pub enum RegistryError {
    /// A tour needs at least one step.
    Empty,
    /// Two steps share an id.
    DuplicateStepId(StepId),
    /// The JSON script could not be parsed.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "step registry must contain at least one step"),
            Self::DuplicateStepId(id) => write!(f, "duplicate step id: {id}"),
            #[cfg(feature = "serde")]
            Self::Json(err) => write!(f, "invalid step script: {err}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// Immutable ordered sequence of steps.
///
/// Never empty, and step ids are unique. The first step is held apart from
/// the rest so every clamped lookup has a step to land on.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRegistry {
    first: Step,
    rest: Vec<Step>,
}

/// Iterator over a registry's steps in tour order.
pub type Steps<'a> = std::iter::Chain<std::iter::Once<&'a Step>, std::slice::Iter<'a, Step>>;

impl StepRegistry {
    /// Build a registry, validating that it is non-empty and ids are unique.
    pub fn new(steps: Vec<Step>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(&step.id) {
                return Err(RegistryError::DuplicateStepId(step.id.clone()));
            }
        }
        let mut steps = steps.into_iter();
        let first = steps.next().ok_or(RegistryError::Empty)?;
        Ok(Self {
            first,
            rest: steps.collect(),
        })
    }

    /// Parse a JSON array of steps.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, RegistryError> {
        let steps: Vec<Step> = serde_json::from_str(s).map_err(RegistryError::Json)?;
        Self::new(steps)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the last step.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.rest.len()
    }

    /// Clamp an arbitrary index into `[0, len)`.
    #[inline]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        match index {
            0 => Some(&self.first),
            n => self.rest.get(n - 1),
        }
    }

    /// Step at a clamped index.
    pub fn step(&self, index: usize) -> &Step {
        self.get(self.clamp_index(index)).unwrap_or(&self.first)
    }

    /// Position of a step by id.
    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.iter().position(|step| &step.id == id)
    }

    pub fn iter(&self) -> Steps<'_> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Number of steps gated on a target interaction.
    pub fn targeted_count(&self) -> usize {
        self.iter().filter(|step| step.is_targeted()).count()
    }
}

impl<'a> IntoIterator for &'a StepRegistry {
    type Item = &'a Step;
    type IntoIter = Steps<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Vec<Step> {
        vec![
            Step::new("welcome", "Welcome", "A quick look around."),
            Step::new("search", "Search", "Find anything.")
                .target("search-box")
                .action_hint("Type a query"),
            Step::new("done", "Done", "That's it."),
        ]
    }

    #[test]
    fn empty_registry_rejected() {
        assert!(matches!(StepRegistry::new(vec![]), Err(RegistryError::Empty)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let steps = vec![Step::new("a", "A", ""), Step::new("a", "B", "")];
        match StepRegistry::new(steps) {
            Err(RegistryError::DuplicateStepId(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn clamp_index_stays_in_range() {
        let registry = StepRegistry::new(script()).unwrap();
        assert_eq!(registry.clamp_index(0), 0);
        assert_eq!(registry.clamp_index(2), 2);
        assert_eq!(registry.clamp_index(usize::MAX), 2);
        assert_eq!(registry.step(99).id.as_str(), "done");
    }

    #[test]
    fn single_step_registry_lookups() {
        let registry = StepRegistry::new(vec![Step::new("only", "Only", "")]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(registry.last_index(), 0);
        assert_eq!(registry.step(usize::MAX).id.as_str(), "only");
        assert_eq!(registry.get(1), None);
    }

    #[test]
    fn iteration_preserves_script_order() {
        let registry = StepRegistry::new(script()).unwrap();
        let ids: Vec<_> = registry.iter().map(|step| step.id.as_str()).collect();
        assert_eq!(ids, ["welcome", "search", "done"]);
        assert_eq!(registry.get(2).map(|step| step.id.as_str()), Some("done"));
        assert_eq!(registry.get(3), None);
        assert_eq!((&registry).into_iter().count(), 3);
    }

    #[test]
    fn position_and_targeted_count() {
        let registry = StepRegistry::new(script()).unwrap();
        assert_eq!(registry.position(&StepId::from("search")), Some(1));
        assert_eq!(registry.position(&StepId::from("missing")), None);
        assert_eq!(registry.targeted_count(), 1);
        assert!(registry.step(1).is_targeted());
        assert!(!registry.step(0).is_targeted());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_json_script() {
        let json = r#"[
            {"id": "intro", "headline": "Hi", "body": "Start here"},
            {"id": "panel", "target": "side-panel", "headline": "Panel",
             "body": "Open it", "action_hint": "Click the panel"}
        ]"#;
        let registry = StepRegistry::from_json_str(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.step(1).target.as_ref().map(TargetId::as_str),
            Some("side-panel")
        );
        assert_eq!(registry.step(0).action_hint, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_malformed_json() {
        let err = StepRegistry::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RegistryError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
