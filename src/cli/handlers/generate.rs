// src/cli/handlers/generate.rs

use super::commons;
use crate::CancellationToken;
use crate::core::catalog::CollectionCatalog;
use crate::core::collector::{FlowOutcome, OptionCollector};
use crate::core::command_builder;
use crate::core::context::InvocationContext;
use crate::core::suffix_policy::SuffixPolicy;
use crate::system::executor::{CommandRunner, ShellRunner};
use crate::system::prompt::{Prompter, TerminalPrompter};
use crate::system::source::FsSchemaSource;
use crate::system::watcher::FsWatcher;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// The full generation flow: collection pick, schematic pick, option
/// collection, confirmation, execution.
pub fn handle(
    path: Option<PathBuf>,
    root: Option<PathBuf>,
    cancellation_token: &CancellationToken,
) -> Result<()> {
    let project_root = commons::resolve_project_root(root)?;
    let target = path.map(|p| commons::absolute_target(&project_root, p));
    let context = InvocationContext::new(&project_root, target.as_deref());

    // The watcher lives for the whole run so config edits made while
    // prompting are picked up by the next policy query.
    let mut watcher = FsWatcher::new();
    let mut policy = SuffixPolicy::new(&project_root);
    policy
        .initialize(&mut watcher)
        .context("Failed to initialize the suffix policy")?;

    let mut catalog = CollectionCatalog::new(Box::new(FsSchemaSource::new(&project_root)));
    let mut prompter = TerminalPrompter::new();
    let mut runner = ShellRunner::new(&project_root, cancellation_token.clone());

    drive(&mut catalog, &mut prompter, &policy, &context, &mut runner)
}

/// Runs the collector and executes the confirmed command. Cancellation is
/// silent: the user asked for it, there is nothing to report.
pub(crate) fn drive(
    catalog: &mut CollectionCatalog,
    prompter: &mut dyn Prompter,
    policy: &SuffixPolicy,
    context: &InvocationContext,
    runner: &mut dyn CommandRunner,
) -> Result<()> {
    match OptionCollector::new(catalog, prompter, policy, context).run()? {
        FlowOutcome::Confirmed(state) => {
            commons::launch_command(&command_builder::build(&state), runner)
        }
        FlowOutcome::Cancelled => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_COLLECTION;
    use crate::models::{OptionKind, OptionSchema, SchematicSchema};
    use crate::system::executor::ExecutionError;
    use crate::system::source::{SchemaSource, SourceError};
    use std::collections::VecDeque;
    use std::path::Path;

    /// Runner double recording every execution request.
    #[derive(Default)]
    struct RecordingRunner {
        calls: Vec<String>,
    }

    impl CommandRunner for RecordingRunner {
        fn execute(&mut self, command_line: &str) -> Result<String, ExecutionError> {
            self.calls.push(command_line.to_string());
            Ok(String::from("CREATE src/app/my-widget.ts"))
        }
    }

    /// Minimal scripted prompter: answers are raw JSON-ish variants queued
    /// in prompt order.
    enum Answer {
        Input(Option<&'static str>),
        Select(Option<usize>),
        Multi(Option<Vec<usize>>),
        Confirm(Option<bool>),
    }

    struct ScriptedPrompter(VecDeque<Answer>);

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, _p: &str, _i: Option<&str>) -> Result<Option<String>> {
            match self.0.pop_front() {
                Some(Answer::Input(a)) => Ok(a.map(str::to_string)),
                _ => panic!("unexpected input prompt"),
            }
        }
        fn select(&mut self, _p: &str, _items: &[String]) -> Result<Option<usize>> {
            match self.0.pop_front() {
                Some(Answer::Select(a)) => Ok(a),
                _ => panic!("unexpected select prompt"),
            }
        }
        fn multi_select(&mut self, _p: &str, _items: &[String]) -> Result<Option<Vec<usize>>> {
            match self.0.pop_front() {
                Some(Answer::Multi(a)) => Ok(a),
                _ => panic!("unexpected multi-select prompt"),
            }
        }
        fn confirm(&mut self, _p: &str, _d: bool) -> Result<Option<bool>> {
            match self.0.pop_front() {
                Some(Answer::Confirm(a)) => Ok(a),
                _ => panic!("unexpected confirm prompt"),
            }
        }
    }

    struct DefaultOnlySource;

    impl SchemaSource for DefaultOnlySource {
        fn list_collections(&self) -> Vec<String> {
            vec![DEFAULT_COLLECTION.to_string()]
        }
        fn load_collection(&self, _name: &str) -> Result<Vec<SchematicSchema>, SourceError> {
            Ok(vec![
                SchematicSchema::new(
                    "component",
                    None,
                    vec![
                        OptionSchema::new("name", OptionKind::Text)
                            .as_default_option()
                            .path_like(),
                        OptionSchema::new("flat", OptionKind::Boolean),
                    ],
                )
                .unwrap(),
            ])
        }
    }

    fn run_drive(answers: Vec<Answer>) -> RecordingRunner {
        let mut catalog = CollectionCatalog::new(Box::new(DefaultOnlySource));
        let policy = SuffixPolicy::new(Path::new("/nonexistent"));
        let context = InvocationContext::default();
        let mut prompter = ScriptedPrompter(answers.into());
        let mut runner = RecordingRunner::default();
        drive(&mut catalog, &mut prompter, &policy, &context, &mut runner).unwrap();
        runner
    }

    #[test]
    fn cancelling_the_first_prompt_executes_nothing() {
        let runner = run_drive(vec![Answer::Select(None)]);
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn cancelling_the_default_option_prompt_executes_nothing() {
        let runner = run_drive(vec![
            Answer::Select(Some(0)),
            Answer::Select(Some(0)),
            Answer::Input(None),
        ]);
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn confirmed_flow_executes_exactly_once() {
        let runner = run_drive(vec![
            Answer::Select(Some(0)),
            Answer::Select(Some(0)),
            Answer::Input(Some("my-widget")),
            Answer::Multi(Some(vec![0])),
            Answer::Confirm(Some(true)),
            Answer::Confirm(Some(true)),
        ]);
        assert_eq!(
            runner.calls,
            vec!["ng generate @schematics/angular:component my-widget --flat"]
        );
    }
}
