// src/models.rs

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

// --- OPTION SCHEMA MODELS (In-memory working representation) ---

/// The declared value type of a schematic option. Drives which prompt is
/// shown and how the answer is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Boolean,
    Text,
    EnumChoice,
    TextArray,
}

/// Typed, declarative description of one schematic option.
/// Immutable once loaded from a collection.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    pub name: String,
    pub kind: OptionKind,
    /// Only meaningful for `OptionKind::EnumChoice`. Order is preserved from
    /// the collection manifest and is the order shown to the user.
    pub choices: Vec<String>,
    pub default_value: Option<String>,
    /// The positional argument, supplied without a flag name.
    pub is_default_option: bool,
    /// The option value is a filesystem-like path (or a path-qualified name).
    pub is_path_like: bool,
    /// A `false` value must be rendered as `--name=false` instead of being
    /// omitted from the built command.
    pub explicit_negation: bool,
}

impl OptionSchema {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            choices: Vec::new(),
            default_value: None,
            is_default_option: false,
            is_path_like: false,
            explicit_negation: false,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn as_default_option(mut self) -> Self {
        self.is_default_option = true;
        self
    }

    pub fn path_like(mut self) -> Self {
        self.is_path_like = true;
        self
    }
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schematic '{0}' declares more than one default option.")]
    MultipleDefaultOptions(String),
    #[error("Option '{option}' of schematic '{schematic}' is an enum with no choices.")]
    EmptyChoices { schematic: String, option: String },
}

/// One generator's full parameter list, in declaration order.
#[derive(Debug, Clone)]
pub struct SchematicSchema {
    pub name: String,
    pub description: Option<String>,
    options: Vec<OptionSchema>,
}

impl SchematicSchema {
    /// Builds a schema, rejecting shapes the collector cannot walk:
    /// more than one default option, or a choice option with no choices.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        options: Vec<OptionSchema>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let defaults = options.iter().filter(|o| o.is_default_option).count();
        if defaults > 1 {
            return Err(SchemaError::MultipleDefaultOptions(name));
        }
        if let Some(bad) = options
            .iter()
            .find(|o| o.kind == OptionKind::EnumChoice && o.choices.is_empty())
        {
            return Err(SchemaError::EmptyChoices {
                schematic: name,
                option: bad.name.clone(),
            });
        }
        Ok(Self {
            name,
            description,
            options,
        })
    }

    /// The positional option, if the schematic declares one.
    pub fn default_option(&self) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.is_default_option)
    }

    pub fn has_default_option(&self) -> bool {
        self.default_option().is_some()
    }

    /// Whether the default option expects a path-qualified value.
    pub fn has_path(&self) -> bool {
        self.default_option().is_some_and(|o| o.is_path_like)
    }

    /// All non-positional options, in declaration order.
    pub fn named_options(&self) -> impl Iterator<Item = &OptionSchema> {
        self.options.iter().filter(|o| !o.is_default_option)
    }

    pub fn option(&self, name: &str) -> Option<&OptionSchema> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

// --- COLLECTED VALUES ---

/// A resolved option value, tagged by the kind of prompt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

/// Working memory of one generation run. Built incrementally; every
/// accumulation step is additive. Discarded after the run.
#[derive(Debug, Clone, Default)]
pub struct GenerateState {
    /// Filesystem path the generation was invoked from, if any.
    pub target_path: String,
    /// Sub-project name derived from the invocation path.
    pub project_name: Option<String>,
    pub collection_name: Option<String>,
    pub schema_name: Option<String>,
    pub default_option_value: Option<String>,
    /// Insertion order is preserved; the built command reproduces it.
    options: Vec<(String, OptionValue)>,
}

impl GenerateState {
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            ..Default::default()
        }
    }

    pub fn add_collection(&mut self, name: impl Into<String>) {
        self.collection_name = Some(name.into());
    }

    pub fn add_schema(&mut self, name: impl Into<String>) {
        self.schema_name = Some(name.into());
    }

    pub fn add_default_option(&mut self, value: impl Into<String>) {
        self.default_option_value = Some(value.into());
    }

    pub fn add_option(&mut self, name: impl Into<String>, value: OptionValue) {
        self.options.push((name.into(), value));
    }

    pub fn options(&self) -> &[(String, OptionValue)] {
        &self.options
    }
}

// --- COLLECTION MANIFEST MODELS (What is read from JSON on disk) ---
// These mirror the `collection.json` / `schema.json` layout of schematic
// packages. Only deserialized, never written.

#[derive(Deserialize, Debug, Clone)]
pub struct CollectionManifestDoc {
    #[serde(default)]
    pub schematics: HashMap<String, SchematicDeclarationDoc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SchematicDeclarationDoc {
    /// Relative path to the schematic's `schema.json`.
    pub schema: Option<String>,
    pub description: Option<String>,
    /// Hidden schematics are internal to the collection and never offered.
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SchemaDoc {
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PropertyDoc {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,
    pub default: Option<serde_json::Value>,
    pub format: Option<String>,
    /// `{"$source": "argv", "index": 0}` marks the positional option.
    #[serde(rename = "$default")]
    pub default_source: Option<DefaultSourceDoc>,
    #[serde(default)]
    pub visible: Option<bool>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DefaultSourceDoc {
    #[serde(rename = "$source")]
    pub source: String,
    pub index: Option<u64>,
}

impl PropertyDoc {
    /// Whether the property is the argv-positional option of its schema.
    pub fn is_positional(&self) -> bool {
        self.default_source
            .as_ref()
            .is_some_and(|d| d.source == "argv" && d.index == Some(0))
    }
}
