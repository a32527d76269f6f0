//! Scene objects handed to the extractor and importer

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::armature::Armature;
use crate::error::{Result, RigError};

/// Stable identity token of a scene object
///
/// The skeleton cache is keyed by this value, so a host must hand out a new
/// id whenever the object it refers to is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    Armature,
    Mesh,
    Empty,
    Camera,
    Light,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Mesh => "MESH",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Camera => "CAMERA",
            ObjectKind::Light => "LIGHT",
        };
        f.write_str(name)
    }
}

/// An object of the host scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    armature: Option<Armature>,
    animation_data: bool,
}

impl SceneObject {
    /// Create a non-armature object
    pub fn new(id: ObjectId, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            armature: None,
            animation_data: true,
        }
    }

    /// Wrap an armature in an object named after it
    pub fn with_armature(id: ObjectId, armature: Armature) -> Self {
        Self {
            id,
            name: armature.name().to_string(),
            kind: ObjectKind::Armature,
            armature: Some(armature),
            animation_data: true,
        }
    }

    /// Mark the object as unable to hold animation data
    pub fn without_animation_data(mut self) -> Self {
        self.animation_data = false;
        self
    }

    pub fn supports_animation(&self) -> bool {
        self.animation_data
    }

    /// The armature data, or [`RigError::InvalidTarget`] for other kinds
    pub fn armature(&self) -> Result<&Armature> {
        match (&self.kind, &self.armature) {
            (ObjectKind::Armature, Some(armature)) => Ok(armature),
            _ => Err(RigError::InvalidTarget {
                name: self.name.clone(),
                kind: self.kind,
            }),
        }
    }
}
