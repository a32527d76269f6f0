//! Import command implementation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use t2m_rig::{
    AnimationImporter, AnimationPayload, ImportOptions, ImportReport, PoseRecorder, SceneObject,
    read_animation, validate_frame_rate,
};

use crate::commands::{load_rig, write_action};
use crate::config::Settings;

/// Options shared by commands that write keyframes
#[derive(Args, Debug, Clone)]
pub struct KeyframeArgs {
    /// Scene frame rate (defaults to the stored setting)
    #[arg(long)]
    pub fps: Option<f32>,

    /// Name of the created action (defaults to the stored setting)
    #[arg(long)]
    pub action_name: Option<String>,

    /// Drop the root-motion track
    #[arg(long)]
    pub no_root_motion: bool,

    /// Write the recorded action to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl KeyframeArgs {
    pub fn frame_rate(&self, settings: &Settings) -> Result<f32> {
        let fps = self.fps.unwrap_or(settings.frame_rate);
        validate_frame_rate(fps).context("Frame rate must be a positive number")
    }

    pub fn import_options(&self, settings: &Settings) -> ImportOptions {
        ImportOptions {
            action_name: self
                .action_name
                .clone()
                .unwrap_or_else(|| settings.action_name.clone()),
            apply_root_motion: settings.apply_root_motion && !self.no_root_motion,
        }
    }
}

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the rig file
    pub rig: PathBuf,

    /// Generated animation or save file
    pub animation: PathBuf,

    #[command(flatten)]
    pub keyframes: KeyframeArgs,
}

pub fn execute(args: ImportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path.as_deref())?;
    let object = load_rig(&args.rig, None)?;

    let data = fs::read_to_string(&args.animation)
        .with_context(|| format!("Failed to read {}", args.animation.display()))?;
    let payload = read_animation(&data)
        .with_context(|| format!("Invalid animation in {}", args.animation.display()))?;

    apply_payload(&object, &payload, &args.keyframes, &settings)?;
    Ok(())
}

/// Load settings from an explicit path or the per-user default
pub(crate) fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = Settings::resolve_path(config_path).context("Failed to determine settings location")?;
    Settings::load(&path).with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// Import a payload onto a rig object and write the recorded action
pub(crate) fn apply_payload(
    object: &SceneObject,
    payload: &AnimationPayload,
    keyframes: &KeyframeArgs,
    settings: &Settings,
) -> Result<ImportReport> {
    let mut recorder = PoseRecorder::new(object, keyframes.frame_rate(settings)?)?;
    let importer = AnimationImporter::new(keyframes.import_options(settings));
    let report = importer
        .import(payload, &mut recorder)
        .with_context(|| format!("Failed to import animation onto '{}'", object.name))?;

    for bone in &report.skipped_unknown {
        eprintln!("Skipped track for unknown bone '{bone}'");
    }

    if let Some(action) = recorder.action() {
        write_action(action, keyframes.output.as_deref())?;
    }

    log::info!(
        "Action '{}' spans frames {}..={} with {} animated bones",
        importer.options().action_name,
        report.frame_start,
        report.frame_end,
        report.animated_bones.len()
    );
    Ok(report)
}
