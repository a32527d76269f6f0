//! Skeleton command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use t2m_rig::SkeletonExtractor;

use crate::commands::{load_rig, write_output};
use crate::utils::{TreeNode, TreeOptions, render_tree};

#[derive(Subcommand)]
pub enum SkeletonCommands {
    /// Extract the target skeleton of a rig as JSON
    Extract {
        /// Path to the rig file
        rig: PathBuf,

        /// Write the skeleton to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Identity of the rig object in log output (defaults to a hash of its path)
        #[arg(long)]
        object_id: Option<u64>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Display the extracted skeleton as a tree
    Tree {
        /// Path to the rig file
        rig: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show one line per bone without offsets
        #[arg(short, long)]
        compact: bool,
    },
}

pub fn execute(cmd: SkeletonCommands) -> Result<()> {
    match cmd {
        SkeletonCommands::Extract {
            rig,
            output,
            object_id,
            pretty,
        } => handle_extract(rig, output, object_id, pretty),
        SkeletonCommands::Tree {
            rig,
            depth,
            no_color,
            compact,
        } => handle_tree(rig, depth, no_color, compact),
    }
}

fn handle_extract(
    rig: PathBuf,
    output: Option<PathBuf>,
    object_id: Option<u64>,
    pretty: bool,
) -> Result<()> {
    let object = load_rig(&rig, object_id)?;
    let skeleton = SkeletonExtractor::new()
        .extract(&object)
        .with_context(|| format!("Failed to extract skeleton from {}", rig.display()))?;

    let json = if pretty {
        skeleton.to_json_pretty()?
    } else {
        skeleton.to_json()?
    };
    write_output(&json, output.as_deref())
}

fn handle_tree(rig: PathBuf, depth: Option<usize>, no_color: bool, compact: bool) -> Result<()> {
    let object = load_rig(&rig, None)?;
    let skeleton = SkeletonExtractor::new()
        .extract(&object)
        .with_context(|| format!("Failed to extract skeleton from {}", rig.display()))?;

    let root = TreeNode::from_skeleton(&object.name, &skeleton);
    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: true,
        compact,
    };

    let tree_output = render_tree(&root, &options);
    print!("{tree_output}");
    Ok(())
}
