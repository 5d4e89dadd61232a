// src/system/source.rs

use crate::constants::{COLLECTION_MANIFEST_FILENAME, DEFAULT_COLLECTION};
use crate::models::{
    CollectionManifestDoc, OptionKind, OptionSchema, PropertyDoc, SchemaDoc, SchematicSchema,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Collections probed for presence in the target project, in menu order.
/// The default collection is always offered, installed or not, because the
/// built-in manifest can stand in for it.
const COMMON_COLLECTIONS: &[&str] = &[
    DEFAULT_COLLECTION,
    "@angular/material",
    "@ionic/angular-toolkit",
    "@ngrx/schematics",
    "@nativescript/schematics",
    "@nstudio/schematics",
    "ngx-spec",
];

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Collection '{0}' is not installed in this project.")]
    NotFound(String),
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Manifest '{path}' is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Schema(#[from] crate::models::SchemaError),
}

/// Catalog lookup seam: where schematic collections and their schemas come
/// from. The interactive flow never touches the filesystem directly.
pub trait SchemaSource {
    /// Collections available to this project, in menu order.
    fn list_collections(&self) -> Vec<String>;

    /// All schemas of one collection, sorted by schematic name.
    fn load_collection(&self, name: &str) -> Result<Vec<SchematicSchema>, SourceError>;
}

/// Reads collections from the target project's `node_modules`, following the
/// standard schematic package layout: a `collection.json` manifest pointing
/// at one `schema.json` per schematic.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    project_root: PathBuf,
}

impl FsSchemaSource {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    fn manifest_path(&self, collection: &str) -> PathBuf {
        self.project_root
            .join("node_modules")
            .join(collection)
            .join(COLLECTION_MANIFEST_FILENAME)
    }
}

impl SchemaSource for FsSchemaSource {
    fn list_collections(&self) -> Vec<String> {
        COMMON_COLLECTIONS
            .iter()
            .filter(|&&name| name == DEFAULT_COLLECTION || self.manifest_path(name).is_file())
            .map(|&name| name.to_string())
            .collect()
    }

    fn load_collection(&self, name: &str) -> Result<Vec<SchematicSchema>, SourceError> {
        let manifest_path = self.manifest_path(name);
        if !manifest_path.is_file() {
            if name == DEFAULT_COLLECTION {
                log::debug!("'{}' not installed, using the built-in manifest.", name);
                return Ok(builtin_default_manifest());
            }
            return Err(SourceError::NotFound(name.to_string()));
        }

        let manifest: CollectionManifestDoc = read_json(&manifest_path)?;
        let base_dir = manifest_path
            .parent()
            .unwrap_or(&self.project_root)
            .to_path_buf();

        let mut names: Vec<&String> = manifest
            .schematics
            .iter()
            .filter(|(_, decl)| !decl.hidden)
            .map(|(name, _)| name)
            .collect();
        names.sort();

        let mut schemas = Vec::with_capacity(names.len());
        for schematic_name in names {
            let decl = &manifest.schematics[schematic_name];
            let doc = match &decl.schema {
                Some(relative) => read_json::<SchemaDoc>(&base_dir.join(relative))?,
                None => SchemaDoc::default(),
            };
            schemas.push(schema_from_doc(
                schematic_name,
                decl.description.clone(),
                &doc,
            )?);
        }
        Ok(schemas)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SourceError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Maps one `schema.json` document onto the in-memory schema model.
fn schema_from_doc(
    name: &str,
    description: Option<String>,
    doc: &SchemaDoc,
) -> Result<SchematicSchema, SourceError> {
    let mut options = Vec::new();
    for (prop_name, raw) in &doc.properties {
        let prop: PropertyDoc = serde_json::from_value(raw.clone()).unwrap_or_default();
        if prop.visible == Some(false) {
            continue;
        }
        options.push(option_from_property(prop_name, &prop));
    }
    Ok(SchematicSchema::new(name, description, options)?)
}

fn option_from_property(name: &str, prop: &PropertyDoc) -> OptionSchema {
    let kind = if !prop.enum_values.is_empty() {
        OptionKind::EnumChoice
    } else {
        match prop.value_type.as_deref() {
            Some("boolean") => OptionKind::Boolean,
            Some("array") => OptionKind::TextArray,
            _ => OptionKind::Text,
        }
    };

    let mut option = OptionSchema::new(name, kind);
    option.choices = prop
        .enum_values
        .iter()
        .map(json_value_as_text)
        .collect();
    option.default_value = prop.default.as_ref().map(json_value_as_text);
    option.is_default_option = prop.is_positional();
    option.is_path_like = prop.format.as_deref() == Some("path");
    option
}

/// Renders a JSON scalar the way it must appear on the command line.
fn json_value_as_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Schemas of the default collection, used when the collection package is
/// not installed locally (the "quick generate" fast-path relies on this).
pub fn builtin_default_manifest() -> Vec<SchematicSchema> {
    let name_option = || {
        OptionSchema::new("name", OptionKind::Text)
            .as_default_option()
            .path_like()
    };
    let flat = || OptionSchema::new("flat", OptionKind::Boolean);
    let skip_tests = || OptionSchema::new("skipTests", OptionKind::Boolean);

    let component = SchematicSchema::new(
        "component",
        Some("Create an Angular component.".to_string()),
        vec![
            name_option(),
            OptionSchema::new("style", OptionKind::EnumChoice)
                .with_choices(vec![
                    "css".to_string(),
                    "scss".to_string(),
                    "sass".to_string(),
                    "less".to_string(),
                ])
                .with_default("css"),
            OptionSchema::new("changeDetection", OptionKind::EnumChoice)
                .with_choices(vec!["Default".to_string(), "OnPush".to_string()])
                .with_default("Default"),
            OptionSchema::new("standalone", OptionKind::Boolean),
            OptionSchema::new("prefix", OptionKind::Text),
            OptionSchema::new("selector", OptionKind::Text),
            flat(),
            skip_tests(),
        ],
    );
    let service = SchematicSchema::new(
        "service",
        Some("Create an Angular service.".to_string()),
        vec![name_option(), flat(), skip_tests()],
    );
    let module = SchematicSchema::new(
        "module",
        Some("Create an Angular module.".to_string()),
        vec![
            name_option(),
            OptionSchema::new("routing", OptionKind::Boolean),
            OptionSchema::new("module", OptionKind::Text),
            flat(),
        ],
    );
    let directive = SchematicSchema::new(
        "directive",
        Some("Create an Angular directive.".to_string()),
        vec![
            name_option(),
            OptionSchema::new("prefix", OptionKind::Text),
            flat(),
            skip_tests(),
        ],
    );
    let pipe = SchematicSchema::new(
        "pipe",
        Some("Create an Angular pipe.".to_string()),
        vec![name_option(), flat(), skip_tests()],
    );
    let guard = SchematicSchema::new(
        "guard",
        Some("Create an Angular route guard.".to_string()),
        vec![
            name_option(),
            OptionSchema::new("implements", OptionKind::TextArray),
            flat(),
            skip_tests(),
        ],
    );

    [component, service, module, directive, pipe, guard]
        .into_iter()
        .map(|schema| schema.expect("built-in schemas declare a single default option"))
        .collect()
}
