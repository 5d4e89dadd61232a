// src/cli/handlers/quick.rs

use super::commons;
use crate::CancellationToken;
use crate::core::catalog::CollectionCatalog;
use crate::core::collector::{FlowOutcome, OptionCollector};
use crate::core::command_builder;
use crate::core::context::InvocationContext;
use crate::core::suffix_policy::SuffixPolicy;
use crate::system::executor::ShellRunner;
use crate::system::prompt::TerminalPrompter;
use crate::system::source::FsSchemaSource;
use crate::system::watcher::FsWatcher;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// The shortcut flow: one schematic of the default collection, one name
/// prompt, confirmation, execution. Uses the catalog's fast-path, so the
/// collection is never explicitly loaded.
pub fn handle(
    schematic: &str,
    path: Option<PathBuf>,
    root: Option<PathBuf>,
    cancellation_token: &CancellationToken,
) -> Result<()> {
    let project_root = commons::resolve_project_root(root)?;
    let target = path.map(|p| commons::absolute_target(&project_root, p));
    let context = InvocationContext::new(&project_root, target.as_deref());

    let mut watcher = FsWatcher::new();
    let mut policy = SuffixPolicy::new(&project_root);
    policy
        .initialize(&mut watcher)
        .context("Failed to initialize the suffix policy")?;

    let mut catalog = CollectionCatalog::new(Box::new(FsSchemaSource::new(&project_root)));
    let mut prompter = TerminalPrompter::new();
    let mut runner = ShellRunner::new(&project_root, cancellation_token.clone());

    let outcome = OptionCollector::new(&mut catalog, &mut prompter, &policy, &context)
        .run_quick(schematic)?;

    match outcome {
        FlowOutcome::Confirmed(state) => {
            commons::launch_command(&command_builder::build(&state), &mut runner)
        }
        FlowOutcome::Cancelled => Ok(()),
    }
}
