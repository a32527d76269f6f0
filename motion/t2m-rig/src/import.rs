//! Applying a generated payload to a host armature
//!
//! The importer is host agnostic: it writes keyframes through the
//! [`AnimationTarget`] trait and never touches host state directly. Payload
//! rotations are absolute orientations in the generator's frame; they are
//! turned into pose-bone local rotations with [`compose_local_rotation`].

use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

use crate::armature::Armature;
use crate::error::{Result, RigError};
use crate::math::{inverse_or_fallback, rotation_of};
use crate::naming::denormalize_bone_name;
use crate::payload::{AnimationPayload, Track};

/// Default name of the action created by an import
pub const DEFAULT_ACTION_NAME: &str = "T2MGeneratedAction";

/// Host view of an armature that can receive keyframes
pub trait AnimationTarget {
    /// Rest hierarchy of the target
    fn armature(&self) -> &Armature;

    /// Scene frame rate in frames per second
    fn frame_rate(&self) -> f32;

    /// Create a fresh action named `name` and make it the active one
    ///
    /// Fails with [`RigError::NoAnimationData`](crate::RigError::NoAnimationData)
    /// when the object cannot hold animation.
    fn begin_action(&mut self, name: &str) -> Result<()>;

    fn set_frame_range(&mut self, start: i32, end: i32);

    /// Put a pose bone back to its rest orientation and location
    fn reset_pose(&mut self, bone: &str);

    fn insert_rotation_key(&mut self, bone: &str, frame: f32, rotation: Quat);

    fn insert_location_key(&mut self, bone: &str, frame: f32, location: Vec3);
}

/// Options controlling an import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub action_name: String,
    /// Keep the track of the bone carrying both rotation and position keys
    pub apply_root_motion: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            action_name: DEFAULT_ACTION_NAME.to_string(),
            apply_root_motion: true,
        }
    }
}

/// Summary of what an import wrote and skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub frame_start: i32,
    pub frame_end: i32,
    pub rotation_keys: usize,
    pub location_keys: usize,
    /// Host names of the bones that received keys
    pub animated_bones: Vec<String>,
    /// Payload names that matched no bone
    pub skipped_unknown: Vec<String>,
    /// Tracks dropped because root motion was disabled
    pub skipped_root_motion: Vec<String>,
}

/// Accept only a finite, positive frame rate
pub fn validate_frame_rate(fps: f32) -> Result<f32> {
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        Err(RigError::InvalidFrameRate(fps))
    }
}

/// Frame range covering `duration` seconds at `fps`
pub fn frame_range(duration: f64, fps: f32) -> (i32, i32) {
    let end = (duration * f64::from(fps)).ceil();
    (0, end as i32)
}

/// Convert an absolute rotation into a pose-bone local rotation
///
/// A parented bone gets `rest_self⁻¹ × rest_parent × R(incoming)`; a root
/// bone takes the incoming rotation as is. Scale left in the product is
/// discarded when the rotation is extracted.
pub fn compose_local_rotation(rest_self: &Mat4, rest_parent: Option<&Mat4>, incoming: Quat) -> Quat {
    let rotation = Mat4::from_quat(incoming);
    let composed = match rest_parent {
        Some(parent) => inverse_or_fallback(rest_self) * *parent * rotation,
        None => rotation,
    };
    rotation_of(&composed)
}

/// Writes payload tracks as keyframes on an [`AnimationTarget`]
#[derive(Debug, Clone, Default)]
pub struct AnimationImporter {
    options: ImportOptions,
}

impl AnimationImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import `payload` into `target`
    ///
    /// The payload is validated and the action created before any key is
    /// written, so a failure here leaves the target untouched.
    pub fn import<T>(&self, payload: &AnimationPayload, target: &mut T) -> Result<ImportReport>
    where
        T: AnimationTarget + ?Sized,
    {
        payload.validate()?;
        let fps = validate_frame_rate(target.frame_rate())?;
        target.begin_action(&self.options.action_name)?;

        let (frame_start, frame_end) = frame_range(payload.duration, fps);
        target.set_frame_range(frame_start, frame_end);

        let mut report = ImportReport {
            frame_start,
            frame_end,
            ..ImportReport::default()
        };

        for (name, track) in &payload.bones {
            let Some(bone) = resolve_bone(target.armature(), name) else {
                log::warn!("Bone '{}' not found in armature, skipping track", name);
                report.skipped_unknown.push(name.clone());
                continue;
            };

            if !self.options.apply_root_motion && track.is_root_motion_carrier() {
                log::info!("Skipping root motion track of '{}'", bone);
                report.skipped_root_motion.push(bone);
                continue;
            }

            self.apply_track(target, &bone, track, fps, &mut report);
            if !track.is_empty() {
                report.animated_bones.push(bone);
            }
        }

        log::info!(
            "Imported {} rotation and {} location keys into '{}' (frames {}..={})",
            report.rotation_keys,
            report.location_keys,
            self.options.action_name,
            report.frame_start,
            report.frame_end
        );
        Ok(report)
    }

    fn apply_track<T>(&self, target: &mut T, bone: &str, track: &Track, fps: f32, report: &mut ImportReport)
    where
        T: AnimationTarget + ?Sized,
    {
        let (rest_self, rest_parent) = {
            let armature = target.armature();
            match armature.get(bone) {
                Some(b) => (b.rest_matrix, armature.parent_of(b).map(|p| p.rest_matrix)),
                None => return,
            }
        };

        for (seconds, rotation) in track.rotation_keys() {
            target.reset_pose(bone);
            let local = compose_local_rotation(&rest_self, rest_parent.as_ref(), rotation);
            target.insert_rotation_key(bone, seconds * fps, local);
            report.rotation_keys += 1;
        }

        for (seconds, location) in track.position_keys() {
            target.insert_location_key(bone, seconds * fps, location);
            report.location_keys += 1;
        }
    }
}

/// Match a payload bone name against the hierarchy
///
/// The Mixamo separator is restored first; the verbatim name is the fallback.
fn resolve_bone(armature: &Armature, name: &str) -> Option<String> {
    let denormalized = denormalize_bone_name(name);
    if armature.find(&denormalized).is_some() {
        return Some(denormalized);
    }
    armature.find(name).map(|_| name.to_string())
}
