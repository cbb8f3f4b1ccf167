//! Configuration for the scanfmt toolchain.
//!
//! Settings resolve in three layers, later ones winning:
//!
//! 1. `defaults/scanfmt.default.toml`, embedded at build time
//! 2. TOML files named by the user, in the order given
//! 3. [`Overrides`] taken from command line flags
//!
//! The result deserializes into [`ScanfmtConfig`], whose sections are the option structs
//! of `scanfmt-core` itself, so a missing key always falls back to the library default.

use config::{Config, ConfigError, File, FileFormat};
use scanfmt_core::scanfmt::formatting::{FormatOptions, WriterOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/scanfmt.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanfmtConfig {
    pub formatting: FormatOptions,
    pub writer: WriterOptions,
}

/// Values set from the command line. `None` keeps whatever the files say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub shift_width: Option<usize>,
    pub tab_size: Option<usize>,
    pub expand_tabs: Option<bool>,
    pub start_indent: Option<usize>,
}

impl Overrides {
    fn entries(&self) -> Vec<(&'static str, config::Value)> {
        let mut out = Vec::new();
        let width = |n: usize| config::Value::from(n as i64);
        if let Some(n) = self.shift_width {
            out.push(("formatting.shift_width", width(n)));
        }
        if let Some(n) = self.tab_size {
            out.push(("formatting.tab_size", width(n)));
        }
        if let Some(flag) = self.expand_tabs {
            out.push(("formatting.expand_tabs", config::Value::from(flag)));
        }
        if let Some(n) = self.start_indent {
            out.push(("writer.start_indent", width(n)));
        }
        out
    }
}

#[derive(Debug, Clone)]
struct UserFile {
    path: PathBuf,
    required: bool,
}

/// Collects the configuration layers and resolves them in one go.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    files: Vec<UserFile>,
    overrides: Overrides,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file that must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(UserFile {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Adds a file that is skipped when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(UserFile {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> Result<ScanfmtConfig, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        for file in &self.files {
            builder = builder.add_source(
                File::from(file.path.as_path())
                    .format(FileFormat::Toml)
                    .required(file.required),
            );
        }
        for (key, value) in self.overrides.entries() {
            builder = builder.set_override(key, value)?;
        }
        builder.build()?.try_deserialize()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<ScanfmtConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(body.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn embedded_defaults_match_the_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.formatting, FormatOptions::default());
        assert_eq!(config.writer, WriterOptions::default());
    }

    #[test]
    fn overrides_replace_only_what_they_set() {
        let config = Loader::new()
            .with_overrides(Overrides {
                shift_width: Some(2),
                expand_tabs: Some(false),
                ..Overrides::default()
            })
            .build()
            .expect("config to build");
        assert_eq!(config.formatting.shift_width, 2);
        assert!(!config.formatting.expand_tabs);
        assert_eq!(config.formatting.tab_size, 8);
        assert_eq!(config.writer.start_indent, 0);
    }

    #[test]
    fn later_files_win_and_overrides_win_over_files() {
        let first = toml_file("[formatting]\nshift_width = 3\ntab_size = 4\n");
        let second = toml_file("[formatting]\ntab_size = 2\n\n[writer]\nstart_indent = 8\n");
        let config = Loader::new()
            .with_file(first.path())
            .with_file(second.path())
            .with_overrides(Overrides {
                start_indent: Some(6),
                ..Overrides::default()
            })
            .build()
            .expect("config to build");
        assert_eq!(config.formatting.shift_width, 3);
        assert_eq!(config.formatting.tab_size, 2);
        assert_eq!(config.writer.start_indent, 6);
        assert!(config.formatting.expand_tabs);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/definitely/not/here/scanfmt.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/scanfmt.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.formatting, FormatOptions::default());
    }

    #[test]
    fn wrongly_typed_value_is_rejected() {
        let file = toml_file("[formatting]\nshift_width = \"wide\"\n");
        assert!(Loader::new().with_file(file.path()).build().is_err());
    }
}
