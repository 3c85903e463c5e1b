use crate::config::PromptsConfig;
use crate::error::ConfigError;
use std::path::Path;

// Embedded default prompts
const DEFAULT_PLAN_PROMPT: &str = include_str!("../../prompts/plan.md");
const DEFAULT_EXECUTE_PROMPT: &str = include_str!("../../prompts/execute.md");
const DEFAULT_REVIEW_PROMPT: &str = include_str!("../../prompts/review.md");

/// Prompt templates for the three stages.
///
/// Placeholders are `{{QUERY}}`, `{{COUNT}}`, `{{TASK}}` and `{{RESULTS}}`.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub plan: String,
    pub execute: String,
    pub review: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            plan: DEFAULT_PLAN_PROMPT.to_string(),
            execute: DEFAULT_EXECUTE_PROMPT.to_string(),
            review: DEFAULT_REVIEW_PROMPT.to_string(),
        }
    }
}

impl PromptSet {
    /// Load overrides from config, falling back to the embedded templates
    pub fn load(config: &PromptsConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            plan: load_or(config.plan_file.as_deref(), defaults.plan)?,
            execute: load_or(config.execute_file.as_deref(), defaults.execute)?,
            review: load_or(config.review_file.as_deref(), defaults.review)?,
        })
    }

    pub fn render_plan(&self, query: &str, count: usize) -> String {
        render(&self.plan, &[("QUERY", query), ("COUNT", &count.to_string())])
    }

    pub fn render_execute(&self, task: &str) -> String {
        render(&self.execute, &[("TASK", task)])
    }

    pub fn render_review(&self, query: &str, results: &str) -> String {
        render(&self.review, &[("QUERY", query), ("RESULTS", results)])
    }
}

fn load_or(path: Option<&Path>, fallback: String) -> Result<String, ConfigError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::PromptFile {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(fallback),
    }
}

/// Substitute `{{NAME}}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so a query containing `{{TASK}}`
/// comes through verbatim. Unknown placeholders are left as-is.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
