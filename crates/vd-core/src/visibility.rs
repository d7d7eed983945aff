//! Temporary view isolation
//!
//! Isolation restricts what a view renders for one preview/export cycle
//! without touching the elements' own visibility. Hosts that would ask the
//! user before exporting an isolated view read the [`ConfirmationPolicy`]
//! handed to the export call instead of relying on a global event hook.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::view::{ElementId, ViewSpec, Visibility};

/// Answer to the host's "export with temporary isolation?" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfirmationPolicy {
    /// Proceed without asking
    #[default]
    Proceed,
    /// Leave the decision to the user
    Ask,
}

/// Applies and clears temporary isolation on views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityIsolator {
    pub suppress_confirmation: bool,
}

impl VisibilityIsolator {
    pub fn new(suppress_confirmation: bool) -> Self {
        Self {
            suppress_confirmation,
        }
    }

    /// Policy to pass along with any export of isolated views
    pub fn policy(&self) -> ConfirmationPolicy {
        if self.suppress_confirmation {
            ConfirmationPolicy::Proceed
        } else {
            ConfirmationPolicy::Ask
        }
    }

    /// Restrict `view` to exactly `ids`
    ///
    /// Returns `false` when the view was already isolated to the same set.
    pub fn isolate(&self, view: &mut ViewSpec, ids: &BTreeSet<ElementId>) -> bool {
        if view.isolated_ids() == Some(ids) {
            return false;
        }
        view.visibility = Visibility::TemporaryIsolation(ids.clone());
        true
    }

    /// Restrict every view to the same identifier set
    pub fn isolate_all<'a>(
        &self,
        views: impl IntoIterator<Item = &'a mut ViewSpec>,
        ids: &BTreeSet<ElementId>,
    ) -> usize {
        views
            .into_iter()
            .map(|view| self.isolate(view, ids))
            .filter(|changed| *changed)
            .count()
    }

    /// Drop the temporary isolation
    pub fn clear(&self, view: &mut ViewSpec) {
        view.visibility = Visibility::Unrestricted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isometric::build_isometric;
    use glam::DVec3;

    fn ids(values: &[u64]) -> BTreeSet<ElementId> {
        values.iter().copied().map(ElementId).collect()
    }

    #[test]
    fn test_isolate_is_idempotent() {
        let isolator = VisibilityIsolator::new(true);
        let mut view = build_isometric(DVec3::ZERO, "Iso");

        assert!(isolator.isolate(&mut view, &ids(&[1, 2])));
        assert!(!isolator.isolate(&mut view, &ids(&[2, 1])));
        assert_eq!(view.isolated_ids(), Some(&ids(&[1, 2])));

        assert!(isolator.isolate(&mut view, &ids(&[3])));
        assert_eq!(view.isolated_ids(), Some(&ids(&[3])));
    }

    #[test]
    fn test_clear_restores_visibility() {
        let isolator = VisibilityIsolator::default();
        let mut view = build_isometric(DVec3::ZERO, "Iso");
        isolator.isolate(&mut view, &ids(&[7]));
        isolator.clear(&mut view);
        assert_eq!(view.visibility, Visibility::Unrestricted);
    }

    #[test]
    fn test_isolate_all() {
        let isolator = VisibilityIsolator::new(true);
        let mut views = vec![
            build_isometric(DVec3::ZERO, "A"),
            build_isometric(DVec3::ZERO, "B"),
        ];
        assert_eq!(isolator.isolate_all(views.iter_mut(), &ids(&[1])), 2);
        assert_eq!(isolator.isolate_all(views.iter_mut(), &ids(&[1])), 0);
    }

    #[test]
    fn test_policy() {
        assert_eq!(VisibilityIsolator::new(true).policy(), ConfirmationPolicy::Proceed);
        assert_eq!(VisibilityIsolator::new(false).policy(), ConfirmationPolicy::Ask);
    }
}
