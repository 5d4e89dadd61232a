// src/core/command_builder.rs

use crate::constants::{ARRAY_VALUE_DELIMITER, DEFAULT_COLLECTION};
use crate::models::{GenerateState, OptionValue};
use std::borrow::Cow;

/// Assembles the final schematic invocation from accumulated state:
///
/// `<collection>:<schema> <defaultValue?> --<option>=<value> ...`
///
/// Deterministic and pure: the same unmutated state always yields the same
/// string, and options appear in exactly the order they were accumulated.
/// Values are quoted so the result is safe to hand to a shell. Boolean
/// `true` renders as a bare flag; `false` is omitted entirely (a collector
/// that wants explicit negation stores the textual `"false"` instead).
pub fn build(state: &GenerateState) -> String {
    let collection = state
        .collection_name
        .as_deref()
        .unwrap_or(DEFAULT_COLLECTION);
    let schema = state.schema_name.as_deref().unwrap_or_default();

    let mut parts = vec![format!("{collection}:{schema}")];

    if let Some(value) = &state.default_option_value {
        parts.push(quoted(value).into_owned());
    }

    for (name, value) in state.options() {
        match value {
            OptionValue::Bool(true) => parts.push(format!("--{name}")),
            OptionValue::Bool(false) => {}
            OptionValue::Text(text) => parts.push(format!("--{name}={}", quoted(text))),
            OptionValue::List(items) => {
                let joined = items.join(&ARRAY_VALUE_DELIMITER.to_string());
                parts.push(format!("--{name}={}", quoted(&joined)));
            }
        }
    }

    parts.join(" ")
}

/// Shell-safe quoting, applied only when the value needs it. Schematic
/// values are mostly plain names, paths and comma lists; those stay
/// readable. `try_quote` only fails on interior NUL bytes, which cannot
/// come out of an interactive prompt; the raw value is kept then.
fn quoted(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'_' | b'@' | b'%' | b'+' | b'=' | b':' | b',' | b'.' | b'/' | b'-'
                )
        });
    if plain {
        Cow::Borrowed(value)
    } else {
        shlex::try_quote(value).unwrap_or(Cow::Borrowed(value))
    }
}
