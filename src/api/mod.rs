use tracing::debug;

pub(crate) use crate::config::{Config, ConfigError};
pub(crate) use crate::diagnostic::Diagnostic;
pub(crate) use crate::format::format_program;
pub(crate) use crate::transform::run_passes;


/// Why a conversion produced no output.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The source did not lex or parse. Every diagnostic is kept.
    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<Diagnostic>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convert node-style callbacks in `source` to `.then` chains, with the
/// default configuration.
pub fn convert(source: &str) -> Result<String, ConvertError> {
    convert_with(source, &Config::default())
}

/// Convert with an explicit configuration.
///
/// The configuration is validated before the source is parsed.
pub fn convert_with(source: &str, config: &Config) -> Result<String, ConvertError> {
    config.validate()?;

    let (mut program, comments) =
        crate::parse_source(source, &config.parse).map_err(ConvertError::Parse)?;
    debug!(
        statements = program.body.len(),
        comments = comments.len(),
        "parsed source"
    );

    run_passes(&mut program, &config.rules);
    Ok(format_program(&program, &comments, &config.print))
}

/// Convert with options given as a TOML document merged over the defaults,
/// e.g. `print.indent = "  "`.
pub fn convert_with_overrides(source: &str, overrides: &str) -> Result<String, ConvertError> {
    let config = Config::from_toml_str(overrides)?;
    convert_with(source, &config)
}
