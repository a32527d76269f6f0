//! Skeleton extraction
//!
//! Turns a host [`Armature`] into the tool-agnostic [`Skeleton`] sent to the
//! generation service. Only the root bone is converted into the Text2Motion
//! axis convention; every other bone is stored relative to its parent's rest
//! transform, so the conversion is carried down the chain implicitly.
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use t2m_rig::{Armature, ObjectId, SceneObject, SkeletonExtractor};
//!
//! let armature = Armature::builder("Rig")
//!     .root("mixamorig:Hips", Mat4::IDENTITY)
//!     .child("mixamorig:Spine", "mixamorig:Hips", Mat4::from_translation(Vec3::Z))
//!     .build()?;
//! let object = SceneObject::with_armature(ObjectId(1), armature);
//!
//! let skeleton = SkeletonExtractor::new().extract(&object)?;
//! assert_eq!(skeleton.root.name, "mixamorigHips");
//! assert_eq!(skeleton.root.children[0].name, "mixamorigSpine");
//! # Ok::<(), t2m_rig::RigError>(())
//! ```

use std::collections::HashMap;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::armature::Armature;
use crate::axis::{AxisConvention, axis_conversion, blender_to_t2m};
use crate::error::{Result, RigError};
use crate::math::{inverse_or_fallback, matrix_from_list, matrix_to_list};
use crate::naming::normalize_bone_name;
use crate::object::SceneObject;

/// Skeleton node as understood by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Column-major 4x4 transform in the Text2Motion convention
    pub matrix: [f32; 16],
    #[serde(default)]
    pub children: Vec<Bone>,
}

impl Bone {
    pub fn transform(&self) -> Mat4 {
        matrix_from_list(&self.matrix)
    }

    /// Depth-first search by name
    pub fn find(&self, name: &str) -> Option<&Bone> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Number of bones in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Bone::count).sum::<usize>()
    }
}

/// Complete skeleton: root bone plus world matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub root: Bone,
    pub world_matrix: [f32; 16],
}

impl Skeleton {
    pub fn world_transform(&self) -> Mat4 {
        matrix_from_list(&self.world_matrix)
    }

    pub fn find(&self, name: &str) -> Option<&Bone> {
        self.root.find(name)
    }

    pub fn bone_count(&self) -> usize {
        self.root.count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Walks an armature and produces a [`Skeleton`]
#[derive(Debug, Clone)]
pub struct SkeletonExtractor {
    axis: Mat4,
}

impl Default for SkeletonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonExtractor {
    /// Extractor converting host rigs (+Y forward, +Z up) to Text2Motion
    pub fn new() -> Self {
        Self {
            axis: blender_to_t2m(),
        }
    }

    /// Extractor for arbitrary source and target conventions
    pub fn with_conventions(from: AxisConvention, to: AxisConvention) -> Result<Self> {
        Ok(Self {
            axis: Mat4::from_mat3(axis_conversion(from, to)?),
        })
    }

    /// Conversion applied to the root bone
    pub fn axis_matrix(&self) -> Mat4 {
        self.axis
    }

    /// Extract the skeleton of an armature object
    ///
    /// Only rest transforms are read; the object's pose is never consulted.
    pub fn extract(&self, object: &SceneObject) -> Result<Skeleton> {
        let armature = object.armature()?;
        self.extract_armature(armature)
    }

    /// Extract the skeleton of a bare armature
    ///
    /// Reads rest matrices only; pose state never influences the result.
    pub fn extract_armature(&self, armature: &Armature) -> Result<Skeleton> {
        let mut roots = armature.roots();
        let (root_index, _) = roots
            .next()
            .ok_or_else(|| RigError::EmptyArmature(armature.name().to_string()))?;

        let extra_roots = roots.count();
        if extra_roots > 0 {
            log::warn!(
                "Armature '{}' has {} additional root bone(s); only the first hierarchy is extracted",
                armature.name(),
                extra_roots
            );
        }

        check_normalized_names(armature, root_index)?;

        log::debug!(
            "Extracting skeleton from '{}' ({} bones)",
            armature.name(),
            armature.len()
        );

        Ok(Skeleton {
            root: self.convert(armature, root_index),
            world_matrix: matrix_to_list(&Mat4::IDENTITY),
        })
    }

    fn convert(&self, armature: &Armature, index: usize) -> Bone {
        let bone = &armature.bones()[index];

        let matrix = match armature.parent_of(bone) {
            Some(parent) => inverse_or_fallback(&parent.rest_matrix) * bone.rest_matrix,
            None => self.axis * bone.rest_matrix,
        };

        Bone {
            name: normalize_bone_name(&bone.name),
            matrix: matrix_to_list(&matrix),
            children: bone
                .children
                .iter()
                .map(|&child| self.convert(armature, child))
                .collect(),
        }
    }
}

/// Fail when two bones of the hierarchy normalize to the same name
fn check_normalized_names(armature: &Armature, root_index: usize) -> Result<()> {
    let bones = armature.bones();
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut stack = vec![root_index];

    while let Some(index) = stack.pop() {
        let bone = &bones[index];
        let normalized = normalize_bone_name(&bone.name);
        if let Some(other) = seen.insert(normalized.clone(), &bone.name) {
            log::warn!(
                "Bones '{}' and '{}' both normalize to '{}'",
                other,
                bone.name,
                normalized
            );
            return Err(RigError::DuplicateBone(normalized));
        }
        stack.extend(bone.children.iter().copied());
    }
    Ok(())
}
