//! Generated animation payloads and the save-file envelope
//!
//! The generation service answers with a JSON document of this shape:
//!
//! ```json
//! {
//!   "duration": 2.5,
//!   "prompt": "Walk around the room",
//!   "bones": {
//!     "mixamorigHips": {
//!       "rotation": { "0.0": [0, 0, 0, 1], "0.041": [0, 0.01, 0, 0.99] },
//!       "position": { "0.0": [0, 0, 1], "0.041": [0, 0.02, 1] }
//!     }
//!   }
//! }
//! ```
//!
//! Rotations are quaternions in `[x, y, z, w]` order, timestamps are seconds
//! encoded as strings. A generated result can be stored independently of a
//! session by wrapping it in a [`SaveFile`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};
use crate::math::quat_from_wire;

/// Current save-file format version
pub const SAVE_FILE_VERSION: &str = "1.0";

/// Keyed rotations and positions of a single bone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub rotation: BTreeMap<String, [f32; 4]>,
    #[serde(default)]
    pub position: BTreeMap<String, [f32; 3]>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rotation key given as `[x, y, z, w]`
    pub fn with_rotation(mut self, seconds: f32, xyzw: [f32; 4]) -> Self {
        self.rotation.insert(format_timestamp(seconds), xyzw);
        self
    }

    /// Add a position key
    pub fn with_position(mut self, seconds: f32, xyz: [f32; 3]) -> Self {
        self.position.insert(format_timestamp(seconds), xyz);
        self
    }

    /// Whether this track carries both rotation and position keys
    ///
    /// Only the root-motion bone is expected to do so.
    pub fn is_root_motion_carrier(&self) -> bool {
        !self.rotation.is_empty() && !self.position.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty() && self.position.is_empty()
    }

    /// Normalized rotation keys sorted by time
    ///
    /// Keys whose timestamp does not parse are left out.
    pub fn rotation_keys(&self) -> Vec<(f32, Quat)> {
        sorted_keys(&self.rotation, |&q| quat_from_wire(q))
    }

    /// Position keys sorted by time
    pub fn position_keys(&self) -> Vec<(f32, Vec3)> {
        sorted_keys(&self.position, |&p| Vec3::from_array(p))
    }

    fn validate(&self, bone: &str) -> Result<()> {
        for timestamp in self.rotation.keys().chain(self.position.keys()) {
            if parse_timestamp(timestamp).is_none() {
                return Err(RigError::InvalidTimestamp {
                    bone: bone.to_string(),
                    timestamp: timestamp.clone(),
                });
            }
        }
        Ok(())
    }
}

fn sorted_keys<V, T>(map: &BTreeMap<String, V>, convert: impl Fn(&V) -> T) -> Vec<(f32, T)> {
    let mut keys: Vec<(f32, T)> = map
        .iter()
        .filter_map(|(timestamp, value)| parse_timestamp(timestamp).map(|t| (t, convert(value))))
        .collect();
    keys.sort_by(|a, b| a.0.total_cmp(&b.0));
    keys
}

/// Parse a timestamp key into seconds
pub fn parse_timestamp(timestamp: &str) -> Option<f32> {
    timestamp
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite() && *t >= 0.0)
}

fn format_timestamp(seconds: f32) -> String {
    format!("{seconds:?}")
}

/// A generated animation: duration plus one track per bone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationPayload {
    /// Total length in seconds
    pub duration: f64,
    pub bones: BTreeMap<String, Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AnimationPayload {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn with_track(mut self, bone: impl Into<String>, track: Track) -> Self {
        self.bones.insert(bone.into(), track);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Decode and validate a payload document
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Self = serde_json::from_str(json)?;
        payload.validate()?;
        Ok(payload)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check duration and every timestamp key
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(RigError::InvalidDuration(self.duration));
        }
        for (bone, track) in &self.bones {
            track.validate(bone)?;
        }
        Ok(())
    }

    /// Total number of rotation and position keys
    pub fn key_count(&self) -> usize {
        self.bones
            .values()
            .map(|t| t.rotation.len() + t.position.len())
            .sum()
    }
}

/// Versioned envelope for persisting a generated payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: String,
    /// Serialized [`AnimationPayload`]
    pub content: String,
}

impl SaveFile {
    /// Wrap a payload in a current-version envelope
    pub fn new(payload: &AnimationPayload) -> Result<Self> {
        Ok(Self {
            version: SAVE_FILE_VERSION.to_string(),
            content: payload.to_json()?,
        })
    }

    /// Wrap an already serialized payload, validating it first
    pub fn from_content(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        AnimationPayload::from_json(&content)?;
        Ok(Self {
            version: SAVE_FILE_VERSION.to_string(),
            content,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode the wrapped payload
    pub fn payload(&self) -> Result<AnimationPayload> {
        match self.version.as_str() {
            SAVE_FILE_VERSION => AnimationPayload::from_json(&self.content),
            other => Err(RigError::UnsupportedSaveVersion(other.to_string())),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Decode either a bare payload or a save file
pub fn read_animation(json: &str) -> Result<AnimationPayload> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("version").is_some() && value.get("content").is_some() {
        let save: SaveFile = serde_json::from_value(value)?;
        save.payload()
    } else {
        let payload: AnimationPayload = serde_json::from_value(value)?;
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "duration": 1.0,
        "bones": {
            "root": {
                "rotation": {"0.5": [0, 0, 0, 1], "0.0": [0, 0, 0, 1], "0.25": [0, 0, 0, 1]},
                "position": {"0.0": [1, 2, 3]}
            },
            "child": {"rotation": {"0.0": [0, 0, 0, 1]}}
        },
        "prompt": "wave"
    }"#;

    #[test]
    fn test_decode_sample() {
        let payload = AnimationPayload::from_json(SAMPLE).unwrap();
        assert_eq!(payload.duration, 1.0);
        assert_eq!(payload.prompt.as_deref(), Some("wave"));
        assert_eq!(payload.bones.len(), 2);
        assert!(payload.bones["child"].position.is_empty());
        assert_eq!(payload.key_count(), 5);
    }

    #[test]
    fn test_keys_sorted_by_time_not_text() {
        let track = Track::new()
            .with_rotation(10.0, [0.0, 0.0, 0.0, 1.0])
            .with_rotation(2.0, [0.0, 0.0, 0.0, 1.0])
            .with_rotation(0.5, [0.0, 0.0, 0.0, 1.0]);
        let times: Vec<f32> = track.rotation_keys().iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.5, 2.0, 10.0]);
    }

    #[test]
    fn test_root_motion_carrier() {
        let payload = AnimationPayload::from_json(SAMPLE).unwrap();
        assert!(payload.bones["root"].is_root_motion_carrier());
        assert!(!payload.bones["child"].is_root_motion_carrier());
    }

    #[test]
    fn test_prompt_is_optional() {
        let payload = AnimationPayload::from_json(r#"{"duration": 0.5, "bones": {}}"#).unwrap();
        assert_eq!(payload.prompt, None);
        assert!(!payload.to_json().unwrap().contains("prompt"));
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let json = r#"{"duration": 1.0, "bones": {"root": {"rotation": {"soon": [0,0,0,1]}}}}"#;
        assert!(matches!(
            AnimationPayload::from_json(json),
            Err(RigError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let json = r#"{"duration": -1.0, "bones": {}}"#;
        assert!(matches!(
            AnimationPayload::from_json(json),
            Err(RigError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_wrong_component_count_is_rejected() {
        let json = r#"{"duration": 1.0, "bones": {"root": {"rotation": {"0.0": [0,0,1]}}}}"#;
        assert!(matches!(AnimationPayload::from_json(json), Err(RigError::Json(_))));
    }

    #[test]
    fn test_save_file_envelope() {
        let payload = AnimationPayload::from_json(SAMPLE).unwrap();
        let save = SaveFile::new(&payload).unwrap();
        assert_eq!(save.version, "1.0");
        assert_eq!(save.payload().unwrap(), payload);
    }

    #[test]
    fn test_save_file_unknown_version() {
        let save = SaveFile {
            version: "2.0".to_string(),
            content: "{}".to_string(),
        };
        assert!(matches!(
            save.payload(),
            Err(RigError::UnsupportedSaveVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_save_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.t2m.json");
        let save = SaveFile::from_content(SAMPLE).unwrap();
        save.save(&path).unwrap();
        assert_eq!(SaveFile::load(&path).unwrap(), save);
    }

    #[test]
    fn test_read_animation_accepts_both_forms() {
        let payload = read_animation(SAMPLE).unwrap();
        let save = SaveFile::new(&payload).unwrap().to_json_pretty().unwrap();
        assert_eq!(read_animation(&save).unwrap(), payload);
    }
}
