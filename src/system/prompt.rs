// src/system/prompt.rs

use anyhow::Result;
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use std::io::ErrorKind;

/// Interactive prompt seam consumed by the option collector.
///
/// Every method distinguishes "cancelled" (`Ok(None)`) from an answered
/// prompt, including an empty free-text answer (`Ok(Some(String::new()))`).
pub trait Prompter {
    /// Free-text entry with an optional pre-filled suggestion.
    fn input(&mut self, prompt: &str, initial: Option<&str>) -> Result<Option<String>>;

    /// Single choice among `items`. Returns the selected index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Multi-choice among `items`. Returns the selected indices, in item order.
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Option<Vec<usize>>>;

    /// Yes/no confirmation.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>>;
}

/// Terminal implementation over `dialoguer`.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

/// `dialoguer` reports Ctrl+C on text inputs as an `Interrupted` IO error.
/// The flow treats that the same as dismissing a selection prompt.
fn interruption_as_cancel<T>(result: Result<T, dialoguer::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, initial: Option<&str>) -> Result<Option<String>> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(text) = initial {
            input = input.with_initial_text(text);
        }
        interruption_as_cancel(input.interact_text())
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(selection)
    }

    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Option<Vec<usize>>> {
        let selection = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .interact_opt()?;
        Ok(selection)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact_opt()?;
        Ok(answer)
    }
}
