//! Prompt templates.
//!
//! Templates are rendered with MiniJinja. Bindings are overlaid on the
//! declared variable defaults, and an undefined variable is an error rather
//! than an empty string.

use std::collections::{BTreeMap, HashMap};

use minijinja::{Environment, Error as MiniJinjaError, ErrorKind, UndefinedBehavior, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Variable bindings passed to a renderer
pub type TemplateBindings = HashMap<String, String>;

/// Template result type alias
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Template errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing variable '{name}' in template {template}")]
    MissingVariable { template: String, name: String },

    #[error("malformed template {template}: {message}")]
    Malformed { template: String, message: String },

    #[error("failed to render template {template}: {message}")]
    Render { template: String, message: String },

    #[error("template not found: {name}")]
    NotFound { name: String },

    #[error("template {name} version {version} already registered")]
    DuplicateVersion { name: String, version: u32 },
}

/// Anything that can turn bindings into a prompt
pub trait PromptRenderer {
    fn render(&self, bindings: &TemplateBindings) -> TemplateResult<String>;
}

/// Declared template variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVariable {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Used when the caller supplies no binding
    #[serde(default)]
    pub default: Option<String>,
}

impl PromptVariable {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default: Some(default.into()),
        }
    }
}

/// Versioned prompt template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name (unique within a registry)
    pub name: String,
    /// Version number, higher is newer
    pub version: u32,
    /// Template content
    pub template: String,
    /// Declared variables
    #[serde(default)]
    pub variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, version: u32, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            template: template.into(),
            variables: Vec::new(),
        }
    }

    /// Declare a variable
    pub fn with_variable(mut self, variable: PromptVariable) -> Self {
        self.variables.push(variable);
        self
    }

    fn label(&self) -> String {
        format!("{}@v{}", self.name, self.version)
    }

    /// Declared defaults overlaid with the caller's bindings
    fn context(&self, bindings: &TemplateBindings) -> BTreeMap<String, String> {
        let mut context: BTreeMap<String, String> = self
            .variables
            .iter()
            .filter_map(|v| v.default.clone().map(|d| (v.name.clone(), d)))
            .collect();
        context.extend(bindings.iter().map(|(k, v)| (k.clone(), v.clone())));
        context
    }
}

fn configured_env<'a>() -> Environment<'a> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

fn map_error(
    env: &Environment<'_>,
    label: &str,
    context: &BTreeMap<String, String>,
    err: MiniJinjaError,
) -> TemplateError {
    match err.kind() {
        ErrorKind::UndefinedError => {
            // Name the first top-level variable the context lacks
            let mut missing: Vec<String> = env
                .get_template(label)
                .map(|tmpl| tmpl.undeclared_variables(false).into_iter().collect())
                .unwrap_or_default();
            missing.retain(|name| !context.contains_key(name));
            missing.sort();
            let name = missing
                .into_iter()
                .next()
                .or_else(|| err.detail().map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string());
            TemplateError::MissingVariable {
                template: label.to_string(),
                name,
            }
        }
        ErrorKind::SyntaxError => TemplateError::Malformed {
            template: label.to_string(),
            message: err.to_string(),
        },
        _ => TemplateError::Render {
            template: label.to_string(),
            message: err.to_string(),
        },
    }
}

impl PromptRenderer for PromptTemplate {
    fn render(&self, bindings: &TemplateBindings) -> TemplateResult<String> {
        let label = self.label();
        let context = self.context(bindings);

        let mut env = configured_env();
        env.add_template(&label, &self.template)
            .map_err(|e| TemplateError::Malformed {
                template: label.clone(),
                message: e.to_string(),
            })?;

        env.get_template(&label)
            .and_then(|tmpl| tmpl.render(Value::from_serialize(&context)))
            .map_err(|e| map_error(&env, &label, &context, e))
    }
}

/// Templates by name, each with any number of versions
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, BTreeMap<u32, PromptTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template version
    pub fn register(&mut self, template: PromptTemplate) -> TemplateResult<()> {
        let versions = self.templates.entry(template.name.clone()).or_default();
        if versions.contains_key(&template.version) {
            return Err(TemplateError::DuplicateVersion {
                name: template.name,
                version: template.version,
            });
        }
        versions.insert(template.version, template);
        Ok(())
    }

    /// Newest version of a template
    pub fn latest(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates
            .get(name)
            .and_then(|versions| versions.values().next_back())
    }

    pub fn get(&self, name: &str, version: u32) -> Option<&PromptTemplate> {
        self.templates.get(name).and_then(|versions| versions.get(&version))
    }

    /// Render the newest version of a template
    pub fn render(&self, name: &str, bindings: &TemplateBindings) -> TemplateResult<String> {
        self.latest(name)
            .ok_or_else(|| TemplateError::NotFound { name: name.to_string() })?
            .render(bindings)
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
