use super::*;

fn table(text: &str) -> toml::Table {
    text.parse().expect("valid TOML")
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.print.indent, "    ");
    assert_eq!(config.print.base, 0);
    assert_eq!(config.print.newline, "\n");
    assert!(config.print.comments);
    assert!(config.parse.comments);
    assert_eq!(config.parse.max_depth, 256);
}

#[test]
fn test_empty_overrides_keep_defaults() {
    let config = Config::merged(&toml::Table::new()).unwrap();
    assert_eq!(config.print, PrintOptions::default());
    assert_eq!(config.parse, ParseOptions::default());
}

#[test]
fn test_nested_override_merges_key_by_key() {
    let config = Config::from_toml_str("[print]\nindent = \"  \"\n").unwrap();
    assert_eq!(config.print.indent, "  ");
    // Sibling keys keep their defaults.
    assert_eq!(config.print.newline, "\n");
    assert!(config.print.comments);
}

#[test]
fn test_dotted_keys() {
    let config = Config::from_toml_str("parse.max_depth = 64\nprint.base = 1").unwrap();
    assert_eq!(config.parse.max_depth, 64);
    assert_eq!(config.print.base, 1);
}

#[test]
fn test_shape_mismatch_scalar_over_table() {
    let err = Config::merged(&table("print = 4")).unwrap_err();
    assert!(matches!(err, ConfigError::ShapeMismatch { ref key } if key == "print"));
}

#[test]
fn test_shape_mismatch_table_over_scalar() {
    let err = Config::merged(&table("[print.indent]\nstyle = \"\"")).unwrap_err();
    assert!(matches!(err, ConfigError::ShapeMismatch { ref key } if key == "print.indent"));
}

#[test]
fn test_unknown_key() {
    let err = Config::from_toml_str("[print]\nwidth = 80").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey { ref key } if key == "print.width"));
    assert_eq!(err.to_string(), "unknown option 'print.width'");
}

#[test]
fn test_ill_typed_value() {
    let err = Config::from_toml_str("[print]\nbase = \"two\"").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_unusable_values_rejected() {
    assert!(matches!(
        Config::from_toml_str("parse.max_depth = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        Config::from_toml_str("print.indent = \"x\""),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        Config::from_toml_str("print.newline = \"\\r\""),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_syntax_error() {
    let err = Config::from_toml_str("[print").unwrap_err();
    assert!(matches!(err, ConfigError::Syntax(_)));
}
