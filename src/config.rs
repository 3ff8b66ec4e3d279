//! Editor options and the on-disk configuration file.
//!
//! `EditorOptions` is what `Editor::new` consumes. `Config` is the TOML file
//! (`<config dir>/veditor/config.toml`) whose values the command line can
//! override; it is turned into options once at startup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use etcetera::base_strategy::{choose_base_strategy, BaseStrategy};
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::menu::{self, MenuItem};
use crate::upload::{self, Uploader};

/// Terminal cells are treated as 8×16 pixels when sizes are given in px.
pub const PX_PER_COLUMN: u32 = 8;
pub const PX_PER_ROW: u32 = 16;

pub const DEFAULT_WIDTH: &str = "100%";
pub const DEFAULT_HEIGHT: &str = "580px";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A CSS-like size: `"80%"`, `"580px"` or a bare cell count `"40"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dimension {
    Percent(u16),
    Pixels(u32),
    Cells(u16),
}

impl Dimension {
    /// Size in cells along `axis`, never larger than `available`.
    pub fn resolve(self, available: u16, axis: Axis) -> u16 {
        let cells = match self {
            Self::Percent(p) => (u32::from(available) * u32::from(p.min(100)) / 100) as u16,
            Self::Pixels(px) => {
                let per_cell = match axis {
                    Axis::Horizontal => PX_PER_COLUMN,
                    Axis::Vertical => PX_PER_ROW,
                };
                (px / per_cell).min(u32::from(u16::MAX)) as u16
            }
            Self::Cells(n) => n,
        };
        cells.min(available)
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidDimension(s.to_string());
        if let Some(n) = s.strip_suffix('%') {
            n.trim().parse().map(Self::Percent).map_err(|_| invalid())
        } else if let Some(n) = s.strip_suffix("px") {
            n.trim().parse().map(Self::Pixels).map_err(|_| invalid())
        } else {
            s.parse().map(Self::Cells).map_err(|_| invalid())
        }
    }
}

impl TryFrom<String> for Dimension {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Cells(n) => write!(f, "{n}"),
        }
    }
}

impl From<Dimension> for String {
    fn from(d: Dimension) -> Self {
        d.to_string()
    }
}

/// Where the editor draws itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The whole frame handed to `render`.
    Frame,
    /// A fixed region of the frame.
    Area(Rect),
}

/// Construction options for `Editor`.
pub struct EditorOptions {
    /// `None` builds a detached editor: nothing is drawn and UI events are
    /// ignored, but the document API keeps working.
    pub target: Option<Target>,
    pub doc: String,
    pub width: Dimension,
    pub height: Dimension,
    pub upload_file: Option<Uploader>,
    pub menus: Vec<MenuItem>,
    /// Directory the download action writes into.
    pub download_dir: PathBuf,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            target: Some(Target::Frame),
            doc: String::new(),
            width: Dimension::Percent(100),
            height: Dimension::Pixels(580),
            upload_file: None,
            menus: menu::default_items(),
            download_dir: PathBuf::from("."),
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    /// Directory uploads are copied into; no uploader without it.
    pub upload_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub menus: Option<Vec<MenuItem>>,
}

impl Config {
    /// `<platform config dir>/veditor/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        let strategy = choose_base_strategy().ok()?;
        Some(strategy.config_dir().join("veditor").join("config.toml"))
    }

    /// Loads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            upload_dir: overrides.upload_dir.or(self.upload_dir),
            download_dir: overrides.download_dir.or(self.download_dir),
            menus: overrides.menus.or(self.menus),
        }
    }

    pub fn into_options(self, doc: String) -> EditorOptions {
        let defaults = EditorOptions::default();
        EditorOptions {
            target: defaults.target,
            doc,
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            upload_file: self.upload_dir.map(upload::local_dir_uploader),
            menus: self.menus.unwrap_or(defaults.menus),
            download_dir: self.download_dir.unwrap_or(defaults.download_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_parsing() {
        assert_eq!("100%".parse::<Dimension>().unwrap(), Dimension::Percent(100));
        assert_eq!("580px".parse::<Dimension>().unwrap(), Dimension::Pixels(580));
        assert_eq!(" 40 ".parse::<Dimension>().unwrap(), Dimension::Cells(40));
        assert!(matches!(
            "wide".parse::<Dimension>(),
            Err(Error::InvalidDimension(s)) if s == "wide"
        ));
        assert!("-1%".parse::<Dimension>().is_err());
    }

    #[test]
    fn dimension_resolution() {
        assert_eq!(Dimension::Percent(50).resolve(81, Axis::Horizontal), 40);
        assert_eq!(Dimension::Percent(150).resolve(80, Axis::Horizontal), 80);
        // 580px / 16px per row
        assert_eq!(Dimension::Pixels(580).resolve(100, Axis::Vertical), 36);
        assert_eq!(Dimension::Pixels(580).resolve(24, Axis::Vertical), 24);
        assert_eq!(Dimension::Pixels(80).resolve(200, Axis::Horizontal), 10);
        assert_eq!(Dimension::Cells(30).resolve(20, Axis::Horizontal), 20);
    }

    #[test]
    fn option_defaults() {
        let options = EditorOptions::default();
        assert_eq!(options.target, Some(Target::Frame));
        assert_eq!(options.width.to_string(), DEFAULT_WIDTH);
        assert_eq!(options.height.to_string(), DEFAULT_HEIGHT);
        assert!(options.upload_file.is_none());
        assert_eq!(options.menus, menu::default_items());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_file_and_reports_bad_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            width = "80%"
            height = "30"
            download-dir = "/tmp/out"

            [[menus]]
            type = "bold"
            title = "加粗"
            "#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.width, Some(Dimension::Percent(80)));
        assert_eq!(config.height, Some(Dimension::Cells(30)));
        assert_eq!(config.download_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.menus.as_ref().map(Vec::len), Some(1));

        std::fs::write(&path, "width = \"huge\"").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn overrides_win() {
        let file = Config {
            width: Some(Dimension::Cells(10)),
            height: Some(Dimension::Cells(5)),
            ..Config::default()
        };
        let cli = Config {
            width: Some(Dimension::Percent(90)),
            upload_dir: Some(PathBuf::from("up")),
            ..Config::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.width, Some(Dimension::Percent(90)));
        assert_eq!(merged.height, Some(Dimension::Cells(5)));

        let options = merged.into_options("doc".into());
        assert_eq!(options.doc, "doc");
        assert!(options.upload_file.is_some());
        assert_eq!(options.download_dir, PathBuf::from("."));
    }
}
