// src/constants.rs

/// Basename of the lint configuration file read for the suffix allowlist.
pub const TSLINT_FILENAME: &str = "tslint.json";

/// The lint rule carrying user-defined component class suffixes.
pub const SUFFIX_RULE_NAME: &str = "component-class-suffix";

/// Suffix accepted in every project, whatever the lint config says.
pub const DEFAULT_SUFFIX: &str = "Component";

/// The collection used when the user does not pick one explicitly.
pub const DEFAULT_COLLECTION: &str = "@schematics/angular";

/// Runner prepended to the built schematic invocation at execution time.
pub const GENERATE_RUNNER: &str = "ng generate";

/// Manifest file of a schematic collection package.
pub const COLLECTION_MANIFEST_FILENAME: &str = "collection.json";

/// Delimiter splitting free-text answers for array-valued options.
pub const ARRAY_VALUE_DELIMITER: char = ',';
