//! xlate_options: xlate.json parsing and transpiler options.
//!
//! Options are all optional in the file; accessors supply the defaults.
//! Command-line values are layered on top with [`TranspilerOptions::merge`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default indentation width, in spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Name of the configuration file looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "xlate.json";

/// Transpiler options, matching the xlate.json schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspilerOptions {
    pub target: Option<Target>,
    pub indent_width: Option<usize>,
    /// Prepend a comment banner naming the source module.
    pub emit_header: Option<bool>,
    pub out_dir: Option<PathBuf>,
}

impl TranspilerOptions {
    pub fn target(&self) -> Target {
        self.target.unwrap_or_default()
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width.unwrap_or(DEFAULT_INDENT_WIDTH)
    }

    pub fn emit_header(&self) -> bool {
        self.emit_header.unwrap_or(false)
    }

    pub fn out_dir(&self) -> &Path {
        self.out_dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Options with `overrides` applied on top: every value set in
    /// `overrides` wins.
    pub fn merge(mut self, overrides: TranspilerOptions) -> Self {
        if overrides.target.is_some() {
            self.target = overrides.target;
        }
        if overrides.indent_width.is_some() {
            self.indent_width = overrides.indent_width;
        }
        if overrides.emit_header.is_some() {
            self.emit_header = overrides.emit_header;
        }
        if overrides.out_dir.is_some() {
            self.out_dir = overrides.out_dir;
        }
        self
    }

    /// Parse options from xlate.json content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse options from an xlate.json path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

/// Output language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// The V systems language.
    #[default]
    V,
    /// SMT-LIB assertions.
    #[serde(alias = "smt2")]
    Smt,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::V, Target::Smt];

    pub fn name(self) -> &'static str {
        match self {
            Target::V => "v",
            Target::Smt => "smt",
        }
    }

    /// Output file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Target::V => "v",
            Target::Smt => "smt2",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v" => Ok(Target::V),
            "smt" | "smt2" => Ok(Target::Smt),
            _ => Err(ConfigError::UnknownTarget(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown target '{0}' (expected one of: v, smt)")]
    UnknownTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TranspilerOptions::default();
        assert_eq!(options.target(), Target::V);
        assert_eq!(options.indent_width(), 2);
        assert!(!options.emit_header());
        assert_eq!(options.out_dir(), Path::new("."));
    }

    #[test]
    fn test_parse_camel_case() {
        let options =
            TranspilerOptions::parse(r#"{ "target": "smt", "indentWidth": 4, "emitHeader": true, "outDir": "out" }"#)
                .unwrap();
        assert_eq!(options.target(), Target::Smt);
        assert_eq!(options.indent_width(), 4);
        assert!(options.emit_header());
        assert_eq!(options.out_dir(), Path::new("out"));
    }

    #[test]
    fn test_smt2_alias() {
        let options = TranspilerOptions::parse(r#"{ "target": "smt2" }"#).unwrap();
        assert_eq!(options.target(), Target::Smt);
        assert_eq!("SMT2".parse::<Target>().unwrap(), Target::Smt);
        assert!("rust".parse::<Target>().is_err());
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = TranspilerOptions {
            target: Some(Target::Smt),
            indent_width: Some(4),
            ..Default::default()
        };
        let cli = TranspilerOptions {
            indent_width: Some(8),
            emit_header: Some(true),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.target(), Target::Smt);
        assert_eq!(merged.indent_width(), 8);
        assert!(merged.emit_header());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Target::V.extension(), "v");
        assert_eq!(Target::Smt.extension(), "smt2");
        assert_eq!(Target::Smt.to_string(), "smt");
    }
}
