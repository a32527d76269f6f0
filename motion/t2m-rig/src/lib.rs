//! Skeleton extraction and animation import for Text2Motion
//!
//! This crate converts a host armature into the skeleton description sent to
//! the Text2Motion generation service, and writes the generated animation
//! back onto the armature as keyframes.
//!
//! * [`SkeletonExtractor`] walks an [`Armature`] and produces a [`Skeleton`]
//!   with the root bone in the Text2Motion axis convention and every other
//!   bone relative to its parent.
//! * [`SkeletonCache`] keeps the last extraction per [`ObjectId`].
//! * [`AnimationImporter`] applies an [`AnimationPayload`] to any
//!   [`AnimationTarget`]; [`PoseRecorder`] is an in-memory target.
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use t2m_rig::{
//!     AnimationImporter, AnimationPayload, Armature, ObjectId, PoseRecorder, SceneObject, Track,
//! };
//!
//! let armature = Armature::builder("Rig")
//!     .root("mixamorig:Hips", Mat4::from_translation(Vec3::Z))
//!     .build()?;
//! let object = SceneObject::with_armature(ObjectId(1), armature);
//!
//! let payload = AnimationPayload::new(1.0).with_track(
//!     "mixamorigHips",
//!     Track::new().with_rotation(0.0, [0.0, 0.0, 0.0, 1.0]),
//! );
//!
//! let mut recorder = PoseRecorder::new(&object, 30.0)?;
//! let report = AnimationImporter::default().import(&payload, &mut recorder)?;
//! assert_eq!(report.frame_end, 30);
//! assert_eq!(report.animated_bones, vec!["mixamorig:Hips".to_string()]);
//! # Ok::<(), t2m_rig::RigError>(())
//! ```

pub mod action;
pub mod armature;
pub mod axis;
pub mod cache;
pub mod error;
pub mod import;
pub mod math;
pub mod naming;
pub mod object;
pub mod payload;
pub mod skeleton;

pub use glam;

// Re-export common types
pub use action::{Action, BoneChannels, DEFAULT_FRAME_RATE, Keyframe, PoseBone, PoseRecorder};
pub use armature::{Armature, ArmatureBone, ArmatureBuilder};
pub use axis::{Axis, AxisConvention, axis_conversion, blender_to_t2m, t2m_to_blender};
pub use cache::SkeletonCache;
pub use error::{Result, RigError};
pub use import::{
    AnimationImporter, AnimationTarget, DEFAULT_ACTION_NAME, ImportOptions, ImportReport,
    compose_local_rotation, frame_range, validate_frame_rate,
};
pub use object::{ObjectId, ObjectKind, SceneObject};
pub use payload::{AnimationPayload, SaveFile, Track, read_animation};
pub use skeleton::{Bone, Skeleton, SkeletonExtractor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
