//! In-memory animation host
//!
//! [`PoseRecorder`] stands in for a host application: it tracks pose state
//! per bone and collects inserted keyframes into an [`Action`] that can be
//! written out as JSON.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::armature::Armature;
use crate::error::{Result, RigError};
use crate::import::{AnimationTarget, validate_frame_rate};
use crate::math::quat_to_wxyz;
use crate::object::SceneObject;

/// Frame rate used when none is configured
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// A single keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: f32,
    pub value: T,
}

/// Keyframe channels of one bone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneChannels {
    /// Rotation keys as `[w, x, y, z]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotation: Vec<Keyframe<[f32; 4]>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<Keyframe<[f32; 3]>>,
}

impl BoneChannels {
    pub fn key_count(&self) -> usize {
        self.rotation.len() + self.location.len()
    }
}

/// Recorded animation clip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub frame_start: i32,
    pub frame_end: i32,
    pub channels: BTreeMap<String, BoneChannels>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn channel(&self, bone: &str) -> Option<&BoneChannels> {
        self.channels.get(bone)
    }

    pub fn key_count(&self) -> usize {
        self.channels.values().map(BoneChannels::key_count).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Current pose of a bone relative to its rest transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseBone {
    pub rotation: Quat,
    pub location: Vec3,
}

impl Default for PoseBone {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            location: Vec3::ZERO,
        }
    }
}

/// [`AnimationTarget`] that records keys in memory
#[derive(Debug)]
pub struct PoseRecorder<'a> {
    object: &'a SceneObject,
    armature: &'a Armature,
    frame_rate: f32,
    pose: BTreeMap<String, PoseBone>,
    action: Option<Action>,
}

impl<'a> PoseRecorder<'a> {
    /// Wrap an armature object
    ///
    /// Fails for other object kinds and for a frame rate that is not finite
    /// and positive.
    pub fn new(object: &'a SceneObject, frame_rate: f32) -> Result<Self> {
        let armature = object.armature()?;
        let frame_rate = validate_frame_rate(frame_rate)?;
        Ok(Self {
            object,
            armature,
            frame_rate,
            pose: BTreeMap::new(),
            action: None,
        })
    }

    /// Pose of `bone`, rest pose if it was never touched
    pub fn pose(&self, bone: &str) -> PoseBone {
        self.pose.get(bone).copied().unwrap_or_default()
    }

    /// Action being recorded
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn into_action(self) -> Option<Action> {
        self.action
    }

    fn channels(&mut self, bone: &str) -> Option<&mut BoneChannels> {
        let action = self.action.as_mut()?;
        Some(action.channels.entry(bone.to_string()).or_default())
    }
}

impl AnimationTarget for PoseRecorder<'_> {
    fn armature(&self) -> &Armature {
        self.armature
    }

    fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    fn begin_action(&mut self, name: &str) -> Result<()> {
        if !self.object.supports_animation() {
            return Err(RigError::NoAnimationData(self.object.name.clone()));
        }
        log::debug!("Creating action '{}' on {}", name, self.object.id);
        self.action = Some(Action::new(name));
        Ok(())
    }

    fn set_frame_range(&mut self, start: i32, end: i32) {
        if let Some(action) = self.action.as_mut() {
            action.frame_start = start;
            action.frame_end = end;
        }
    }

    fn reset_pose(&mut self, bone: &str) {
        self.pose.insert(bone.to_string(), PoseBone::default());
    }

    fn insert_rotation_key(&mut self, bone: &str, frame: f32, rotation: Quat) {
        self.pose.entry(bone.to_string()).or_default().rotation = rotation;
        if let Some(channels) = self.channels(bone) {
            insert_key(&mut channels.rotation, frame, quat_to_wxyz(rotation));
        }
    }

    fn insert_location_key(&mut self, bone: &str, frame: f32, location: Vec3) {
        self.pose.entry(bone.to_string()).or_default().location = location;
        if let Some(channels) = self.channels(bone) {
            insert_key(&mut channels.location, frame, location.to_array());
        }
    }
}

/// Insert a key keeping the channel sorted; an existing key at `frame` is replaced
fn insert_key<T>(keys: &mut Vec<Keyframe<T>>, frame: f32, value: T) {
    match keys.binary_search_by(|k| k.frame.total_cmp(&frame)) {
        Ok(index) => keys[index].value = value,
        Err(index) => keys.insert(index, Keyframe { frame, value }),
    }
}
