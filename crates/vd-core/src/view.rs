//! View specifications shared by the section and isometric builders

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::isometric::IsometricCamera;
use crate::section::SectionView;

/// Identifier of an element in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Level of detail the host renders a view at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetailLevel {
    Coarse,
    Medium,
    /// Used for every generated view
    #[default]
    Fine,
}

/// What the view looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewKind {
    /// Frame-aligned orthographic cut
    Section(SectionView),
    /// Fixed-angle 3D view
    Isometric(IsometricCamera),
}

/// Which elements a view renders
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Everything the host would normally show
    #[default]
    Unrestricted,
    /// Only the listed elements, for the current preview/export cycle
    TemporaryIsolation(BTreeSet<ElementId>),
}

/// A view to be created on a drawing sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Unique within a sheet
    pub name: String,
    pub kind: ViewKind,
    /// Drawing scale 1:N
    pub scale: u32,
    pub detail_level: DetailLevel,
    pub visibility: Visibility,
}

impl ViewSpec {
    pub fn new(name: impl Into<String>, kind: ViewKind, scale: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            scale,
            detail_level: DetailLevel::Fine,
            visibility: Visibility::Unrestricted,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, ViewKind::Section(_))
    }

    pub fn is_isometric(&self) -> bool {
        matches!(self.kind, ViewKind::Isometric(_))
    }

    /// The isolated identifier set, if the view is restricted
    pub fn isolated_ids(&self) -> Option<&BTreeSet<ElementId>> {
        match &self.visibility {
            Visibility::Unrestricted => None,
            Visibility::TemporaryIsolation(ids) => Some(ids),
        }
    }
}
