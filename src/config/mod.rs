//! Conversion options.
//!
//! A [`Config`] is an immutable value built per conversion. Callers either
//! use the defaults, adjust fields directly, or merge a TOML override
//! document over the defaults with [`Config::merged`].

use serde::{Deserialize, Serialize};

use crate::transform::{self, Flattener, Matcher, Rewriter};

/// Options for the lexer and parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseOptions {
    /// Collect comments so the printer can re-attach them.
    pub comments: bool,
    /// Maximum nesting of statements and expressions.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comments: true,
            max_depth: crate::parser::MAX_NESTING_DEPTH,
        }
    }
}

/// Options for the printer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrintOptions {
    /// One level of indentation.
    pub indent: String,
    /// Number of indentation levels applied to every line.
    pub base: usize,
    pub newline: String,
    /// Print comments collected by the parser.
    pub comments: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            base: 0,
            newline: "\n".to_string(),
            comments: true,
        }
    }
}

/// The rewriting rules run by the pipeline. Only settable in code.
#[derive(Clone, Copy, Debug)]
pub struct Rules {
    pub matcher: Matcher,
    pub rewriter: Rewriter,
    pub matcher_dual: Matcher,
    pub rewriter_dual: Rewriter,
    pub flattener: Flattener,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            matcher: transform::callback::is_node_callback,
            rewriter: transform::callback::rewrite_node_callback,
            matcher_dual: transform::callback::is_dual_callback,
            rewriter_dual: transform::callback::rewrite_dual_callback,
            flattener: transform::flatten::flatten,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseOptions,
    #[serde(default)]
    pub print: PrintOptions,
    #[serde(skip)]
    pub rules: Rules,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("option '{key}' cannot be merged: one side is a table and the other is not")]
    ShapeMismatch { key: String },

    #[error("unknown option '{key}'")]
    UnknownKey { key: String },

    #[error("invalid option value: {0}")]
    Invalid(String),

    #[error("invalid TOML in options: {0}")]
    Syntax(#[from] toml::de::Error),
}

impl Config {
    /// Merge `overrides` over the defaults, key by key.
    ///
    /// Nested tables merge recursively. Every override key must exist in
    /// the defaults, and a table may only replace a table.
    pub fn merged(overrides: &toml::Table) -> Result<Config, ConfigError> {
        let defaults = Config::default();
        let mut table = match toml::Value::try_from(&defaults) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(ConfigError::Invalid("defaults are not a table".to_string())),
            Err(e) => return Err(ConfigError::Invalid(e.to_string())),
        };
        merge_table(&mut table, overrides, "")?;

        let mut config: Config = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Invalid(e.message().to_string()))?;
        config.rules = defaults.rules;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML override document and merge it over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Config, ConfigError> {
        let overrides: toml::Table = text.parse()?;
        Self::merged(&overrides)
    }

    /// Reject values that are well-typed but unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parse.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "parse.max_depth must be at least 1".to_string(),
            ));
        }
        if !self.print.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::Invalid(
                "print.indent may only contain spaces and tabs".to_string(),
            ));
        }
        if self.print.newline != "\n" && self.print.newline != "\r\n" {
            return Err(ConfigError::Invalid(
                "print.newline must be \"\\n\" or \"\\r\\n\"".to_string(),
            ));
        }
        Ok(())
    }
}

fn merge_table(
    base: &mut toml::Table,
    overrides: &toml::Table,
    prefix: &str,
) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        let Some(slot) = base.get_mut(key) else {
            return Err(ConfigError::UnknownKey { key: path });
        };
        match (slot, value) {
            (toml::Value::Table(inner), toml::Value::Table(over)) => {
                merge_table(inner, over, &path)?;
            }
            (toml::Value::Table(_), _) | (_, toml::Value::Table(_)) => {
                return Err(ConfigError::ShapeMismatch { key: path });
            }
            (slot, value) => *slot = value.clone(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
