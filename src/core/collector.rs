// src/core/collector.rs

use crate::constants::{ARRAY_VALUE_DELIMITER, DEFAULT_COLLECTION};
use crate::core::catalog::CollectionCatalog;
use crate::core::command_builder;
use crate::core::context::InvocationContext;
use crate::core::suffix_policy::SuffixPolicy;
use crate::models::{GenerateState, OptionKind, OptionSchema, OptionValue, SchematicSchema};
use crate::system::prompt::Prompter;
use anyhow::{Result, anyhow};

/// One prompt boundary per state. Cancelling any prompt is the single
/// uniform transition to `Cancelled`, wherever the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowStage {
    Start,
    HasCollection,
    HasSchema,
    HasDefaultOption,
    CollectingOptions,
    Confirmed,
    Cancelled,
}

/// Terminal result of one collection run.
#[derive(Debug)]
pub enum FlowOutcome {
    /// The user confirmed the assembled command; the state is ready for
    /// [`command_builder::build`] and execution.
    Confirmed(GenerateState),
    /// The user dismissed a prompt or declined the confirmation. Silent by
    /// design: cancelling is a deliberate action, not an error.
    Cancelled,
}

/// The interactive state machine: walks one schematic's option schema,
/// prompting in a defined order and accumulating an ordered set of values.
///
/// Consumed by one run; a new run starts a fresh instance.
pub struct OptionCollector<'a> {
    catalog: &'a mut CollectionCatalog,
    prompter: &'a mut dyn Prompter,
    policy: &'a SuffixPolicy,
    context: &'a InvocationContext,
    stage: FlowStage,
    state: GenerateState,
    schema: Option<SchematicSchema>,
    quick: bool,
}

impl<'a> OptionCollector<'a> {
    pub fn new(
        catalog: &'a mut CollectionCatalog,
        prompter: &'a mut dyn Prompter,
        policy: &'a SuffixPolicy,
        context: &'a InvocationContext,
    ) -> Self {
        let mut state = GenerateState::new(context.target_path.clone());
        state.project_name = context.project_name.clone();
        Self {
            catalog,
            prompter,
            policy,
            context,
            stage: FlowStage::Start,
            state,
            schema: None,
            quick: false,
        }
    }

    /// Runs the full flow: collection pick, schema pick, default option,
    /// option multi-select and values, confirmation.
    pub fn run(mut self) -> Result<FlowOutcome> {
        loop {
            self.stage = match self.stage {
                FlowStage::Start => self.choose_collection()?,
                FlowStage::HasCollection => self.choose_schema()?,
                FlowStage::HasSchema => self.ask_default_option()?,
                FlowStage::HasDefaultOption => FlowStage::CollectingOptions,
                FlowStage::CollectingOptions => self.collect_options_and_confirm()?,
                FlowStage::Confirmed => return Ok(FlowOutcome::Confirmed(self.state)),
                FlowStage::Cancelled => {
                    log::debug!("Generation flow cancelled by the user.");
                    return Ok(FlowOutcome::Cancelled);
                }
            };
        }
    }

    /// Runs the shortcut flow for one known schematic of the default
    /// collection: only the default option is asked, then confirmation.
    /// Relies on the catalog's documented fast-path, so no load step.
    pub fn run_quick(mut self, schema_name: &str) -> Result<FlowOutcome> {
        self.quick = true;
        self.state.add_schema(schema_name);
        self.schema = Some(self.catalog.create_schema(DEFAULT_COLLECTION, schema_name)?);
        self.stage = FlowStage::HasSchema;
        self.run()
    }

    fn choose_collection(&mut self) -> Result<FlowStage> {
        let collections = self.catalog.list_collections();
        if collections.is_empty() {
            return Err(anyhow!("No schematic collections are available."));
        }

        let Some(index) = self
            .prompter
            .select("Schematics collection", &collections)?
        else {
            return Ok(FlowStage::Cancelled);
        };
        let collection = collections[index].clone();

        // Load failure aborts the whole flow; a partial schema set is
        // never usable.
        self.catalog.load(&collection)?;
        self.state.add_collection(collection);
        Ok(FlowStage::HasCollection)
    }

    fn choose_schema(&mut self) -> Result<FlowStage> {
        let collection = self
            .state
            .collection_name
            .clone()
            .ok_or_else(|| anyhow!("Internal flow error: no collection selected."))?;

        let names = self.catalog.schema_names(&collection)?;
        let Some(index) = self.prompter.select("Schematic to generate", &names)? else {
            return Ok(FlowStage::Cancelled);
        };

        let schema = self.catalog.create_schema(&collection, &names[index])?;
        self.state.add_schema(schema.name.clone());
        self.schema = Some(schema);
        Ok(FlowStage::HasSchema)
    }

    /// Prompts for the positional option, if the schema declares one. The
    /// suggested value is seeded from the invocation context for path-like
    /// options. An empty answer is a dismissal, same as cancelling.
    fn ask_default_option(&mut self) -> Result<FlowStage> {
        let Some(option) = self.schema().default_option().cloned() else {
            return Ok(FlowStage::CollectingOptions);
        };

        let suggestion = if option.is_path_like {
            self.context.suggested_default()
        } else {
            None
        };
        let prompt = if option.is_path_like {
            format!("{} (or path/{})", option.name, option.name)
        } else {
            format!("Value for '{}'", option.name)
        };

        let Some(answer) = self.prompter.input(&prompt, suggestion.as_deref())? else {
            return Ok(FlowStage::Cancelled);
        };
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Ok(FlowStage::Cancelled);
        }

        self.advisory_suffix_check(&answer);
        self.state.add_default_option(answer);
        Ok(FlowStage::HasDefaultOption)
    }

    /// Suffix policy is advisory: the allowlist is consulted and the result
    /// logged, but the typed value is accepted as-is.
    fn advisory_suffix_check(&self, value: &str) {
        let segment = value.rsplit('/').next().unwrap_or(value);
        let candidate = segment.rsplit('-').next().unwrap_or(segment);
        if candidate.is_empty() {
            return;
        }
        if self.policy.has_suffix(candidate) {
            log::debug!("Trailing segment '{}' matches the suffix allowlist.", candidate);
        } else {
            log::debug!(
                "Trailing segment '{}' is not in the suffix allowlist {:?}.",
                candidate,
                self.policy.suffixes()
            );
        }
    }

    /// Lets the user pick *which* options to fill before asking for any
    /// value, so the value-prompt cost is only paid for wanted options.
    /// Ends with the confirmation showing the fully assembled command.
    fn collect_options_and_confirm(&mut self) -> Result<FlowStage> {
        if !self.quick {
            let remaining: Vec<OptionSchema> =
                self.schema().named_options().cloned().collect();

            if !remaining.is_empty() {
                let labels: Vec<String> =
                    remaining.iter().map(|o| o.name.clone()).collect();
                let Some(selected) = self
                    .prompter
                    .multi_select("Options to configure", &labels)?
                else {
                    return Ok(FlowStage::Cancelled);
                };

                for index in selected {
                    let option = &remaining[index];
                    let Some(value) = self.ask_option_value(option)? else {
                        return Ok(FlowStage::Cancelled);
                    };
                    self.accumulate(option, value);
                }
            }
        }

        let command = command_builder::build(&self.state);
        match self.prompter.confirm(&format!("Confirm: {command}"), true)? {
            Some(true) => Ok(FlowStage::Confirmed),
            Some(false) | None => Ok(FlowStage::Cancelled),
        }
    }

    /// One prompt per declared value kind; `Ok(None)` means the user
    /// cancelled mid-sequence.
    fn ask_option_value(&mut self, option: &OptionSchema) -> Result<Option<OptionValue>> {
        let value = match option.kind {
            OptionKind::Boolean => {
                let default = option.default_value.as_deref() == Some("true");
                match self
                    .prompter
                    .confirm(&format!("Enable '{}'?", option.name), default)?
                {
                    Some(flag) => OptionValue::Bool(flag),
                    None => return Ok(None),
                }
            }
            OptionKind::EnumChoice => {
                let prompt = format!("Value for '{}'", option.name);
                match self.prompter.select(&prompt, &option.choices)? {
                    Some(index) => OptionValue::Text(option.choices[index].clone()),
                    None => return Ok(None),
                }
            }
            OptionKind::Text => {
                let prompt = format!("Value for '{}'", option.name);
                match self
                    .prompter
                    .input(&prompt, option.default_value.as_deref())?
                {
                    Some(text) => OptionValue::Text(text),
                    None => return Ok(None),
                }
            }
            OptionKind::TextArray => {
                let prompt = format!(
                    "Values for '{}' ({}-separated)",
                    option.name, ARRAY_VALUE_DELIMITER
                );
                match self.prompter.input(&prompt, None)? {
                    Some(text) => OptionValue::List(
                        text.split(ARRAY_VALUE_DELIMITER)
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ),
                    None => return Ok(None),
                }
            }
        };
        Ok(Some(value))
    }

    /// Accumulation is additive only. A declined boolean on an option that
    /// requires explicit negation is stored textually so the builder renders
    /// `--name=false` instead of omitting it.
    fn accumulate(&mut self, option: &OptionSchema, value: OptionValue) {
        let value = match value {
            OptionValue::Bool(false) if option.explicit_negation => {
                OptionValue::Text("false".to_string())
            }
            other => other,
        };
        self.state.add_option(option.name.clone(), value);
    }

    fn schema(&self) -> &SchematicSchema {
        self.schema
            .as_ref()
            .expect("flow stages past HasSchema always carry a schema")
    }
}
