//! Request and response bodies of the generate endpoint

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use t2m_rig::Skeleton;

/// Prompt used when none is given
pub const DEFAULT_PROMPT: &str = "Walk around the room";

/// Longest prompt the service accepts, in characters
pub const MAX_PROMPT_LENGTH: usize = 2048;

/// Generation model to request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVersion {
    #[default]
    Stable,
    #[serde(rename = "labs-0.1.0", alias = "labs010")]
    Labs010,
}

impl ModelVersion {
    /// Endpoint path for this model
    pub fn path(&self) -> &'static str {
        match self {
            ModelVersion::Stable => "/api/generate",
            ModelVersion::Labs010 => "/api/labs010/generate",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVersion::Stable => write!(f, "stable"),
            ModelVersion::Labs010 => write!(f, "labs-0.1.0"),
        }
    }
}

impl FromStr for ModelVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(ModelVersion::Stable),
            "labs-0.1.0" | "labs010" => Ok(ModelVersion::Labs010),
            other => Err(format!(
                "Unknown model version '{other}', expected 'stable' or 'labs-0.1.0'"
            )),
        }
    }
}

/// Body of a generate request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub target_skeleton: Skeleton,
    /// Requested length; 0 lets the service decide
    pub seconds: u32,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, target_skeleton: Skeleton, seconds: u32) -> Self {
        let mut prompt: String = prompt.into();
        if prompt.chars().count() > MAX_PROMPT_LENGTH {
            log::warn!("Prompt exceeds {} characters, truncating", MAX_PROMPT_LENGTH);
            prompt = prompt.chars().take(MAX_PROMPT_LENGTH).collect();
        }
        Self {
            prompt,
            target_skeleton,
            seconds,
        }
    }
}

/// Body of a generate response
///
/// `result` holds the serialized animation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub result: Option<String>,
}

impl GenerateResponse {
    /// The payload text, `None` when absent or blank
    pub fn into_payload(self) -> Option<String> {
        self.result.filter(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use t2m_rig::{Armature, SkeletonExtractor};

    fn skeleton() -> Skeleton {
        let armature = Armature::builder("Rig")
            .root("mixamorig:Hips", Mat4::IDENTITY)
            .build()
            .unwrap();
        SkeletonExtractor::new().extract_armature(&armature).unwrap()
    }

    #[test]
    fn test_model_version_parsing() {
        assert_eq!("stable".parse::<ModelVersion>().unwrap(), ModelVersion::Stable);
        assert_eq!("labs-0.1.0".parse::<ModelVersion>().unwrap(), ModelVersion::Labs010);
        assert_eq!("LABS010".parse::<ModelVersion>().unwrap(), ModelVersion::Labs010);
        assert!("beta".parse::<ModelVersion>().is_err());
    }

    #[test]
    fn test_model_version_paths() {
        assert_eq!(ModelVersion::default().path(), "/api/generate");
        assert_eq!(ModelVersion::Labs010.path(), "/api/labs010/generate");
        assert_eq!(ModelVersion::Labs010.to_string(), "labs-0.1.0");
    }

    #[test]
    fn test_request_body_fields() {
        let request = GenerateRequest::new(DEFAULT_PROMPT, skeleton(), 5);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["prompt"], "Walk around the room");
        assert_eq!(value["seconds"], 5);
        assert_eq!(value["target_skeleton"]["root"]["name"], "mixamorigHips");
    }

    #[test]
    fn test_long_prompt_is_truncated() {
        let request = GenerateRequest::new("a".repeat(3000), skeleton(), 0);
        assert_eq!(request.prompt.len(), MAX_PROMPT_LENGTH);
    }

    #[test]
    fn test_blank_result_is_no_payload() {
        let response: GenerateResponse = serde_json::from_str(r#"{"result": "  "}"#).unwrap();
        assert_eq!(response.into_payload(), None);
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_payload(), None);
        let response: GenerateResponse = serde_json::from_str(r#"{"result": "{}"}"#).unwrap();
        assert_eq!(response.into_payload().as_deref(), Some("{}"));
    }
}
