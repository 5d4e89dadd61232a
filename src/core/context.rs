// src/core/context.rs

use std::path::{Component, Path, PathBuf};

/// Where the generation was triggered from. Only used to seed the suggested
/// value of a schematic's default (positional) option.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    /// The path handed over by the caller, verbatim.
    pub target_path: String,
    /// Sub-project the target path belongs to (`projects/<name>/...`).
    pub project_name: Option<String>,
    /// Directory relative to the project's source root, `/`-separated.
    relative_dir: Option<String>,
}

impl InvocationContext {
    /// Derives the context from the invocation `target` inside `project_root`.
    /// A target outside the root (or no target at all) leaves the context
    /// empty: nothing will be suggested.
    pub fn new(project_root: &Path, target: Option<&Path>) -> Self {
        let Some(target) = target else {
            return Self::default();
        };
        let target_path = target.display().to_string();

        let normalized_target = normalized(target);
        let Ok(relative) = normalized_target.strip_prefix(normalized(project_root)) else {
            log::debug!(
                "Invocation path '{}' is outside the project root, ignoring it.",
                target.display()
            );
            return Self {
                target_path,
                ..Self::default()
            };
        };

        let mut components: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        // `projects/<name>/...` layouts carry the sub-project name.
        let mut project_name = None;
        if components.first().map(String::as_str) == Some("projects") && components.len() >= 2 {
            project_name = Some(components[1].clone());
            components.drain(..2);
        }

        // The source root itself is not part of a generated artifact's path.
        for marker in ["src", "app"] {
            if components.first().map(String::as_str) == Some(marker) {
                components.remove(0);
            }
        }

        let relative_dir = if components.is_empty() {
            None
        } else {
            Some(components.join("/"))
        };

        Self {
            target_path,
            project_name,
            relative_dir,
        }
    }

    /// Suggested prefix for a path-like default option: the sub-path the
    /// user invoked from, ready to have a name appended.
    pub fn suggested_default(&self) -> Option<String> {
        self.relative_dir.as_ref().map(|dir| format!("{dir}/"))
    }
}

fn normalized(path: &Path) -> PathBuf {
    dunce::simplified(path).to_path_buf()
}
