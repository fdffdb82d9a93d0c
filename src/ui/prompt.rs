//! Interactive prompts.
//!
//! Commands ask questions through [`Prompter`] so the flows can run against
//! scripted answers in tests; [`TerminalPrompter`] uses dialoguer.

use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use crate::manifest::is_valid_version;
use crate::Result;

/// Constraint applied to free-text answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    Any,
    NonEmpty,
    /// `major.minor.patch` prefix.
    Version,
}

impl InputRule {
    pub fn check(self, input: &str) -> std::result::Result<(), String> {
        match self {
            InputRule::Any => Ok(()),
            InputRule::NonEmpty if input.trim().is_empty() => Err("Value required".to_string()),
            InputRule::NonEmpty => Ok(()),
            InputRule::Version if is_valid_version(input) => Ok(()),
            InputRule::Version => Err("Invalid version (use semver: x.y.z)".to_string()),
        }
    }
}

/// A free-text question.
#[derive(Debug, Clone)]
pub struct Question {
    pub prompt: String,
    pub default: Option<String>,
    pub rule: InputRule,
}

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default: None,
            rule: InputRule::Any,
        }
    }

    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn rule(mut self, rule: InputRule) -> Self {
        self.rule = rule;
        self
    }
}

/// Capability to ask the user for structured answers.
pub trait Prompter {
    fn input(&self, question: &Question) -> Result<String>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Index of the chosen item.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Indices of the chosen items; `checked` pre-selects entries.
    fn multi_select(&self, prompt: &str, items: &[&str], checked: &[bool]) -> Result<Vec<usize>>;

    /// Hidden input, never empty.
    fn password(&self, prompt: &str) -> Result<String>;
}

/// Prompter backed by the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, question: &Question) -> Result<String> {
        let rule = question.rule;
        let mut input = Input::<String>::new()
            .with_prompt(&question.prompt)
            .allow_empty(rule == InputRule::Any)
            .validate_with(move |value: &String| rule.check(value));
        if let Some(default) = &question.default {
            input = input.default(default.clone());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn multi_select(&self, prompt: &str, items: &[&str], checked: &[bool]) -> Result<Vec<usize>> {
        Ok(MultiSelect::new()
            .with_prompt(format!("{} (space to toggle, enter to confirm)", prompt))
            .items(items)
            .defaults(checked)
            .interact()?)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Ok(Password::new()
            .with_prompt(prompt)
            .validate_with(|value: &String| InputRule::NonEmpty.check(value))
            .interact()?)
    }
}
