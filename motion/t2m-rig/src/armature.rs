//! Host-side bone hierarchy
//!
//! An [`Armature`] is the rest-pose description of a rig as the host tool
//! stores it: every bone has a name, an optional parent and a rest matrix
//! expressed in armature space. Rig files on disk use the same layout:
//!
//! ```json
//! {
//!   "name": "Character",
//!   "bones": [
//!     { "name": "Hips", "rest_matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,1,1] },
//!     { "name": "Spine", "parent": "Hips", "rest_matrix": [...] }
//!   ]
//! }
//! ```
//!
//! Matrices are 16 floats in column-major order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};
use crate::math::{matrix_from_list, matrix_to_list};

/// A single bone of an armature
#[derive(Debug, Clone, PartialEq)]
pub struct ArmatureBone {
    pub name: String,
    /// Index of the parent bone, `None` for roots
    pub parent: Option<usize>,
    /// Indices of child bones in declaration order
    pub children: Vec<usize>,
    /// Rest transform in armature space
    pub rest_matrix: Mat4,
}

impl ArmatureBone {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Validated bone hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RigFile", into = "RigFile")]
pub struct Armature {
    name: String,
    bones: Vec<ArmatureBone>,
    index: HashMap<String, usize>,
}

impl Armature {
    /// Start building an armature
    pub fn builder(name: impl Into<String>) -> ArmatureBuilder {
        ArmatureBuilder {
            name: name.into(),
            bones: Vec::new(),
        }
    }

    /// Load an armature from a JSON rig file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let rig: RigFile = serde_json::from_str(json)?;
        Self::try_from(rig)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// All bones in declaration order
    pub fn bones(&self) -> &[ArmatureBone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&ArmatureBone> {
        self.bones.get(index)
    }

    /// Index of the bone with the given name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&ArmatureBone> {
        self.find(name).map(|i| &self.bones[i])
    }

    pub fn parent_of(&self, bone: &ArmatureBone) -> Option<&ArmatureBone> {
        bone.parent.map(|i| &self.bones[i])
    }

    pub fn children_of(&self, bone: &ArmatureBone) -> impl Iterator<Item = &ArmatureBone> {
        bone.children.iter().map(|&i| &self.bones[i])
    }

    /// Parentless bones in declaration order
    pub fn roots(&self) -> impl Iterator<Item = (usize, &ArmatureBone)> {
        self.bones.iter().enumerate().filter(|(_, b)| b.is_root())
    }

    fn from_specs(name: String, specs: Vec<BoneSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if index.insert(spec.name.clone(), i).is_some() {
                return Err(RigError::DuplicateBone(spec.name.clone()));
            }
        }

        let mut bones = Vec::with_capacity(specs.len());
        for spec in &specs {
            let parent = match &spec.parent {
                Some(parent) => Some(*index.get(parent).ok_or_else(|| {
                    RigError::UnknownParent {
                        bone: spec.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            bones.push(ArmatureBone {
                name: spec.name.clone(),
                parent,
                children: Vec::new(),
                rest_matrix: spec.rest_matrix,
            });
        }

        // A parent chain longer than the bone count must revisit a bone
        for (i, bone) in bones.iter().enumerate() {
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if p == i || steps > bones.len() {
                    return Err(RigError::CyclicHierarchy(bone.name.clone()));
                }
                current = bones[p].parent;
            }
        }

        for i in 0..bones.len() {
            if let Some(p) = bones[i].parent {
                bones[p].children.push(i);
            }
        }

        Ok(Self { name, bones, index })
    }
}

/// Incremental construction of an [`Armature`]
#[derive(Debug, Clone)]
pub struct ArmatureBuilder {
    name: String,
    bones: Vec<BoneSpec>,
}

#[derive(Debug, Clone)]
struct BoneSpec {
    name: String,
    parent: Option<String>,
    rest_matrix: Mat4,
}

impl ArmatureBuilder {
    /// Add a parentless bone
    pub fn root(self, name: impl Into<String>, rest_matrix: Mat4) -> Self {
        self.push(name.into(), None, rest_matrix)
    }

    /// Add a bone under `parent`
    pub fn child(
        self,
        name: impl Into<String>,
        parent: impl Into<String>,
        rest_matrix: Mat4,
    ) -> Self {
        self.push(name.into(), Some(parent.into()), rest_matrix)
    }

    fn push(mut self, name: String, parent: Option<String>, rest_matrix: Mat4) -> Self {
        self.bones.push(BoneSpec {
            name,
            parent,
            rest_matrix,
        });
        self
    }

    /// Validate names and parent links
    pub fn build(self) -> Result<Armature> {
        Armature::from_specs(self.name, self.bones)
    }
}

/// On-disk rig layout, validated into an [`Armature`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigFile {
    pub name: String,
    pub bones: Vec<RigBone>,
}

/// A bone entry of a [`RigFile`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigBone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Column-major rest matrix in armature space
    #[serde(alias = "matrix_local")]
    pub rest_matrix: [f32; 16],
}

impl TryFrom<RigFile> for Armature {
    type Error = RigError;

    fn try_from(rig: RigFile) -> Result<Self> {
        let specs = rig
            .bones
            .into_iter()
            .map(|b| BoneSpec {
                name: b.name,
                parent: b.parent,
                rest_matrix: matrix_from_list(&b.rest_matrix),
            })
            .collect();
        Armature::from_specs(rig.name, specs)
    }
}

impl From<Armature> for RigFile {
    fn from(armature: Armature) -> Self {
        let bones = armature
            .bones
            .iter()
            .map(|b| RigBone {
                name: b.name.clone(),
                parent: b.parent.map(|p| armature.bones[p].name.clone()),
                rest_matrix: matrix_to_list(&b.rest_matrix),
            })
            .collect();
        RigFile {
            name: armature.name,
            bones,
        }
    }
}
