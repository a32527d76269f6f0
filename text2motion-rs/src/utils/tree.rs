//! Tree rendering for bone hierarchies

use console::Style;
use std::collections::BTreeMap;

use t2m_rig::{Bone, Skeleton};

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: BTreeMap<String, String>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// The armature object
    Root,
    /// A bone with children
    Bone,
    /// A bone without children
    EndBone,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: String, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            children: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Build the tree of an extracted skeleton under a root named `name`
    pub fn from_skeleton(name: &str, skeleton: &Skeleton) -> Self {
        TreeNode::new(name.to_string(), NodeType::Root)
            .with_metadata("bones", &skeleton.bone_count().to_string())
            .add_child(Self::from_bone(&skeleton.root))
    }

    fn from_bone(bone: &Bone) -> Self {
        let node_type = if bone.children.is_empty() {
            NodeType::EndBone
        } else {
            NodeType::Bone
        };
        let offset = bone.transform().w_axis;
        let mut node = TreeNode::new(bone.name.clone(), node_type).with_metadata(
            "offset",
            &format!("({:.3}, {:.3}, {:.3})", offset.x, offset.y, offset.z),
        );
        if !bone.children.is_empty() {
            node = node.with_metadata("children", &bone.children.len().to_string());
        }
        bone.children
            .iter()
            .fold(node, |node, child| node.add_child(Self::from_bone(child)))
    }
}

impl NodeType {
    /// Get emoji icon for node type
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "🦴",
            NodeType::Bone => "🔗",
            NodeType::EndBone => "•",
        }
    }

    /// Get color style for node type
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Bone => Style::new().green(),
                NodeType::EndBone => Style::new().yellow(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

/// Render a single node and its children
fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let icon = node.node_type.icon();
    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        icon,
        style.apply_to(&node.name)
    );

    if options.show_metadata && !node.metadata.is_empty() && options.compact {
        let meta_parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", meta_parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    if options.show_metadata && !options.compact && !node.metadata.is_empty() {
        let child_prefix = if depth == 0 {
            ""
        } else if is_last {
            "    "
        } else {
            "│   "
        };
        let meta_prefix = format!("{prefix}{child_prefix}    ");

        for (key, value) in &node.metadata {
            let meta_style = if options.no_color {
                Style::new()
            } else {
                Style::new().dim()
            };
            output.push_str(&format!(
                "{}{}: {}\n",
                meta_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    // Render children
    if !node.children.is_empty() {
        let new_prefix = if depth == 0 {
            String::new()
        } else {
            format!("{}{}", prefix, if is_last { "    " } else { "│   " })
        };

        for (i, child) in node.children.iter().enumerate() {
            let is_last_child = i == node.children.len() - 1;
            render_node(
                child,
                output,
                &new_prefix,
                is_last_child,
                depth + 1,
                options,
            );
        }
    }
}
