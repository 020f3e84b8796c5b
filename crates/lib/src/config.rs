use std::fs;
use std::io::{self, IsTerminal, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::objects::redmine::Issue;
use crate::output::{render_rows, IssueColumn};
use crate::Error;

/// Output defaults for issue list rendering.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Optional columns shown in issue rows.
    pub columns: Vec<IssueColumn>,
    /// Row width, the terminal width is used if unset.
    pub width: Option<usize>,
    /// Highlight issue identifiers, enabled by default when stdout is a terminal.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            columns: vec![IssueColumn::Project],
            width: None,
            color: io::stdout().is_terminal(),
        }
    }
}

impl OutputConfig {
    /// Load the config from a given TOML file.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        debug!("loading output config: {path}");
        let data = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed loading config: {path}: {e}")))?;
        toml::from_str(&data)
            .map_err(|e| Error::Config(format!("failed parsing config: {path}: {e}")))
    }

    /// Load the config from the user config directory, falling back to defaults if
    /// it doesn't exist.
    pub fn from_default_dir() -> crate::Result<Self> {
        let Some(dir) = dirs_next::config_dir() else {
            debug!("no user config directory, using default output config");
            return Ok(Self::default());
        };

        let dir = Utf8PathBuf::from_path_buf(dir).map_err(|path| {
            Error::Config(format!("invalid config directory: {}", path.display()))
        })?;
        let path = dir.join("ticketfmt").join("config.toml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Output issues as table rows using the configured settings.
    pub fn render_rows<'a, I, W>(&self, f: &mut W, issues: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a Issue>,
        W: Write,
    {
        render_rows(f, issues, &self.columns, self.width, self.color)
    }
}
