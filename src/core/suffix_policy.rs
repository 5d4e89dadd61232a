// src/core/suffix_policy.rs

use crate::constants::{DEFAULT_SUFFIX, SUFFIX_RULE_NAME, TSLINT_FILENAME};
use crate::system::watcher::ChangeWatcher;
use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Project-wide allowlist of acceptable class-name suffixes, read from
/// `tslint.json` under the project root and hot-reloaded on change.
///
/// The allowlist always contains [`DEFAULT_SUFFIX`], whatever the config
/// file says (or whether it exists at all). Consumers read the latest
/// snapshot at query time; staleness up to the watcher's notification
/// latency is tolerated.
pub struct SuffixPolicy {
    config_path: PathBuf,
    suffixes: Arc<RwLock<Vec<String>>>,
    watching: bool,
}

impl SuffixPolicy {
    /// Creates the policy for one project root. [`Self::initialize`] must be
    /// called before the first query; until then the allowlist holds only
    /// the default suffix.
    pub fn new(project_root: &Path) -> Self {
        Self {
            config_path: project_root.join(TSLINT_FILENAME),
            suffixes: Arc::new(RwLock::new(vec![DEFAULT_SUFFIX.to_string()])),
            watching: false,
        }
    }

    /// Reads the config and recomputes the allowlist in full. On the first
    /// successful read it also registers a change subscription that re-runs
    /// the parse-and-extract step; later calls (including watcher-triggered
    /// ones) never register a second subscription.
    ///
    /// A missing or malformed config file is not an error: the allowlist
    /// falls back to the default suffix.
    pub fn initialize(&mut self, watcher: &mut dyn ChangeWatcher) -> Result<()> {
        let config = read_config(&self.config_path);
        let parsed = config.is_some();
        self.replace_suffixes(extract_suffixes(config.as_ref()));

        if parsed && !self.watching {
            let config_path = self.config_path.clone();
            let suffixes = Arc::clone(&self.suffixes);
            watcher.watch(
                &self.config_path,
                Box::new(move || {
                    let next = extract_suffixes(read_config(&config_path).as_ref());
                    log::debug!("Suffix allowlist reloaded: {:?}", next);
                    *suffixes.write().expect("suffix lock should not be poisoned") = next;
                }),
            )?;
            self.watching = true;
        }
        Ok(())
    }

    /// Current allowlist snapshot, deduplicated and case-preserved.
    pub fn suffixes(&self) -> Vec<String> {
        self.suffixes
            .read()
            .expect("suffix lock should not be poisoned")
            .clone()
    }

    /// Tells if `candidate` matches an allowlist entry, case-insensitively.
    pub fn has_suffix(&self, candidate: &str) -> bool {
        self.suffixes
            .read()
            .expect("suffix lock should not be poisoned")
            .iter()
            .any(|suffix| suffix.eq_ignore_ascii_case(candidate))
    }

    fn replace_suffixes(&self, next: Vec<String>) {
        *self
            .suffixes
            .write()
            .expect("suffix lock should not be poisoned") = next;
    }
}

/// Tolerant read of the lint config: any I/O or parse failure is treated as
/// "no custom rule present".
fn read_config(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Ignoring malformed '{}': {}", path.display(), e);
            None
        }
    }
}

/// Computes the effective allowlist from a parsed config.
///
/// The rule can be:
/// 1. absent,
/// 2. `true` (stock CLI config),
/// 3. `[true, "Page", "Dialog"]` (user defined).
///
/// Only the third shape, an array with more than two elements, contributes
/// custom suffixes: everything after the leading flag. Duplicates are
/// removed, first-seen order preserved.
fn extract_suffixes(config: Option<&Value>) -> Vec<String> {
    let mut suffixes = vec![DEFAULT_SUFFIX.to_string()];

    let rule = config
        .and_then(|c| c.get("rules"))
        .and_then(|rules| rules.get(SUFFIX_RULE_NAME));

    if let Some(Value::Array(items)) = rule
        && items.len() > 2
    {
        for item in &items[1..] {
            if let Value::String(suffix) = item
                && !suffixes.iter().any(|s| s == suffix)
            {
                suffixes.push(suffix.clone());
            }
        }
    }

    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Test double that keeps callbacks so change events can be fired by hand.
    #[derive(Default)]
    struct FakeWatcher {
        callbacks: Mutex<Vec<Box<dyn Fn() + Send>>>,
        subscriptions: usize,
    }

    impl FakeWatcher {
        fn fire(&self) {
            for callback in self.callbacks.lock().unwrap().iter() {
                callback();
            }
        }
    }

    impl ChangeWatcher for FakeWatcher {
        fn watch(&mut self, _path: &Path, on_change: Box<dyn Fn() + Send>) -> Result<()> {
            self.callbacks.lock().unwrap().push(on_change);
            self.subscriptions += 1;
            Ok(())
        }

        fn subscription_count(&self) -> usize {
            self.subscriptions
        }
    }

    fn policy_for(rule_json: Option<&str>) -> (SuffixPolicy, FakeWatcher, TempDir) {
        let temp = TempDir::new().unwrap();
        if let Some(rule) = rule_json {
            let content = format!(r#"{{ "rules": {{ "component-class-suffix": {rule} }} }}"#);
            fs::write(temp.path().join(TSLINT_FILENAME), content).unwrap();
        }
        let mut policy = SuffixPolicy::new(temp.path());
        let mut watcher = FakeWatcher::default();
        policy.initialize(&mut watcher).unwrap();
        (policy, watcher, temp)
    }

    #[test]
    fn absent_config_yields_default_allowlist() {
        let (policy, watcher, _temp) = policy_for(None);
        assert_eq!(policy.suffixes(), vec!["Component"]);
        // No successful parse, no subscription.
        assert_eq!(watcher.subscription_count(), 0);
    }

    #[test]
    fn rule_shapes_map_to_expected_allowlists() {
        let cases: &[(&str, &[&str])] = &[
            ("true", &["Component"]),
            ("[true]", &["Component"]),
            (r#"[true, "Page"]"#, &["Component"]),
            (r#"[true, "Page", "Dialog"]"#, &["Component", "Page", "Dialog"]),
        ];
        for (rule, expected) in cases {
            let (policy, _watcher, _temp) = policy_for(Some(rule));
            assert_eq!(policy.suffixes(), *expected, "rule shape: {rule}");
        }
    }

    #[test]
    fn duplicates_are_removed_preserving_first_seen_order() {
        let (policy, _watcher, _temp) =
            policy_for(Some(r#"[true, "Page", "Component", "Page", "Dialog"]"#));
        assert_eq!(policy.suffixes(), vec!["Component", "Page", "Dialog"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let (policy, _watcher, _temp) = policy_for(Some(r#"[true, "Page", "Dialog"]"#));
        assert!(policy.has_suffix("component"));
        assert!(policy.has_suffix("PAGE"));
        assert!(policy.has_suffix("dialog"));
        assert!(!policy.has_suffix("Widget"));
    }

    #[test]
    fn malformed_config_falls_back_silently() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(TSLINT_FILENAME), "{ not json").unwrap();
        let mut policy = SuffixPolicy::new(temp.path());
        let mut watcher = FakeWatcher::default();
        policy.initialize(&mut watcher).unwrap();
        assert_eq!(policy.suffixes(), vec!["Component"]);
    }

    #[test]
    fn change_events_reload_but_register_only_one_subscription() {
        let (policy, mut watcher, temp) =
            policy_for(Some(r#"[true, "Page", "Dialog"]"#));
        assert_eq!(watcher.subscription_count(), 1);

        // New config drops the custom rule entirely; the default must survive.
        fs::write(temp.path().join(TSLINT_FILENAME), r#"{ "rules": {} }"#).unwrap();
        watcher.fire();
        assert_eq!(policy.suffixes(), vec!["Component"]);

        // Second change in quick succession: reloaded again, still one
        // subscription even after re-running initialize.
        fs::write(
            temp.path().join(TSLINT_FILENAME),
            r#"{ "rules": { "component-class-suffix": [true, "Widget", "Page"] } }"#,
        )
        .unwrap();
        watcher.fire();
        assert_eq!(policy.suffixes(), vec!["Component", "Widget", "Page"]);

        let mut policy = policy;
        policy.initialize(&mut watcher).unwrap();
        assert_eq!(watcher.subscription_count(), 1);
    }
}
