//! `[output]` section: report view and terminal niceties.
//!
//! ```toml
//! [output]
//! format = "clinical"     # full | clinical | plain | json
//! color = true
//! show_progress = true
//! ```

use consilium_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
    pub color: bool,
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_progress: true,
        }
    }
}

impl FileOutputConfig {
    /// A format given on the command line beats the configured one.
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    /// Color stays off when `NO_COLOR` is set, whatever the file says.
    pub fn use_color(&self) -> bool {
        self.color && std::env::var_os("NO_COLOR").is_none()
    }

    /// JSON output is meant for pipes, so it never gets progress bars.
    pub fn wants_progress(&self, quiet: bool, format: OutputFormat) -> bool {
        self.show_progress && !quiet && format != OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn test_output_section_parses() {
        let config: FileConfig = toml::from_str(
            r#"
[output]
format = "json"
show_progress = false
"#,
        )
        .unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.output.color);
        assert!(!config.output.show_progress);
    }

    #[test]
    fn test_flag_overrides_configured_format() {
        let output = FileOutputConfig {
            format: Some(OutputFormat::Plain),
            ..Default::default()
        };
        assert_eq!(output.resolve_format(None), OutputFormat::Plain);
        assert_eq!(
            output.resolve_format(Some(OutputFormat::Clinical)),
            OutputFormat::Clinical
        );
        assert_eq!(
            FileOutputConfig::default().resolve_format(None),
            OutputFormat::default()
        );
    }

    #[test]
    fn test_progress_suppressed_for_json_and_quiet() {
        let output = FileOutputConfig::default();
        assert!(output.wants_progress(false, OutputFormat::Full));
        assert!(!output.wants_progress(true, OutputFormat::Full));
        assert!(!output.wants_progress(false, OutputFormat::Json));
    }
}
