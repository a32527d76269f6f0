//! Generate command implementation

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use t2m_client::{
    ClientConfig, ClientError, DEFAULT_PROMPT, GenerateRequest, GenerationService, ModelVersion,
    RequestDuration, Text2MotionClient, snap_frames,
};
use t2m_rig::{AnimationPayload, SaveFile, SkeletonExtractor};

use crate::commands::import::{KeyframeArgs, apply_payload, load_settings};
use crate::commands::load_rig;

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the rig file
    pub rig: PathBuf,

    /// Text describing the motion to generate
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Length of the animation in seconds (1-30)
    #[arg(short, long, conflicts_with = "frames")]
    pub seconds: Option<u32>,

    /// Length of the animation in frames, snapped to whole seconds
    #[arg(short, long)]
    pub frames: Option<u32>,

    /// Generation model (stable, labs-0.1.0)
    #[arg(short, long)]
    pub model: Option<ModelVersion>,

    /// API key (overrides the stored key)
    #[arg(long, env = "T2M_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API host (overrides the stored host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also store the generated animation as a save file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Refuse network access
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub keyframes: KeyframeArgs,
}

impl GenerateArgs {
    fn duration(&self, fps: u32) -> RequestDuration {
        match (self.seconds, self.frames) {
            (Some(seconds), _) => RequestDuration::Seconds(seconds),
            (None, Some(frames)) => {
                let snapped = snap_frames(frames, fps);
                if snapped != frames {
                    log::info!("Snapped {} frames to {} at {} fps", frames, snapped, fps);
                }
                RequestDuration::Frames(snapped)
            }
            (None, None) => RequestDuration::Auto,
        }
    }
}

pub fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path.as_deref())?;

    let api_key = args
        .api_key
        .clone()
        .or_else(|| settings.api_key.clone())
        .filter(|key| !key.trim().is_empty())
        .ok_or(ClientError::MissingApiKey)
        .context("Set one with `text2motion-rs config set-api-key <KEY>` or T2M_API_KEY")?;

    let object = load_rig(&args.rig, None)?;
    let skeleton = SkeletonExtractor::new()
        .extract(&object)
        .context("Active object is not an armature, cannot generate animation")?;

    let fps = args.keyframes.frame_rate(&settings)?;
    let whole_fps = fps.round().max(1.0) as u32;
    let seconds = args.duration(whole_fps).seconds(whole_fps);
    let version = args.model.unwrap_or(settings.model_version);

    let config = ClientConfig::new(api_key)
        .with_host(args.host.clone().unwrap_or_else(|| settings.host.clone()))
        .with_timeout(Duration::from_secs(settings.timeout_secs))
        .with_online_access(!args.offline);
    let client = Text2MotionClient::new(config)?;

    let request = GenerateRequest::new(args.prompt.clone(), skeleton, seconds);
    let Some(result) = client
        .generate(&request, version)
        .with_context(|| format!("Failed to make Text2Motion request for prompt: {}", args.prompt))?
    else {
        println!("No animation was generated for prompt: {}", args.prompt);
        return Ok(());
    };

    let mut payload =
        AnimationPayload::from_json(&result).context("Server returned an invalid animation")?;
    if payload.prompt.is_none() {
        payload.prompt = Some(request.prompt.clone());
    }

    if let Some(path) = &args.save {
        SaveFile::new(&payload)?
            .save(path)
            .with_context(|| format!("Failed to write save file {}", path.display()))?;
        log::info!("Saved generated animation to {}", path.display());
    }

    apply_payload(&object, &payload, &args.keyframes, &settings)?;
    Ok(())
}
