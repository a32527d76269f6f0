//! Command implementations

pub mod config;
pub mod generate;
pub mod import;
pub mod skeleton;

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::{Context, Result};
use t2m_rig::{Action, Armature, ObjectId, SceneObject};

/// Load a rig file as an armature object
///
/// Without an explicit id the object is identified by its canonical path.
pub(crate) fn load_rig(path: &Path, object_id: Option<u64>) -> Result<SceneObject> {
    let armature = Armature::load(path)
        .with_context(|| format!("Failed to load rig from {}", path.display()))?;

    let id = match object_id {
        Some(id) => ObjectId(id),
        None => {
            let canonical = fs::canonicalize(path)
                .with_context(|| format!("Failed to resolve {}", path.display()))?;
            let mut hasher = DefaultHasher::new();
            canonical.hash(&mut hasher);
            ObjectId(hasher.finish())
        }
    };
    log::debug!("Loaded rig '{}' as {}", armature.name(), id);

    Ok(SceneObject::with_armature(id, armature))
}

/// Write text to a file, or stdout when no path is given
pub(crate) fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Serialize a recorded action to its destination
pub(crate) fn write_action(action: &Action, output: Option<&Path>) -> Result<()> {
    let json = action
        .to_json_pretty()
        .context("Failed to serialize action")?;
    write_output(&json, output)
}
