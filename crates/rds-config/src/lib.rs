//! Configuration management for the directive sugar pipeline.
//!
//! Parses `rds.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Every section is optional; missing values fall back to built-in defaults.
//!
//! ```toml
//! class_prefix = "rds"
//!
//! [image]
//! alias = ["img", "picture"]
//! img_props_scope = "all"
//!
//! [image.figure_props]
//! class = "figure wide"
//!
//! [video]
//! wrapper = true
//!
//! [video.platforms]
//! loom = "https://www.loom.com/embed/{id}"
//!
//! [link]
//! icon = "img"
//!
//! [badge]
//! default_color = "#0969da"
//!
//! [badge.presets.new]
//! text = "NEW"
//! color = "#1f883d|#3fb950"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rds_tree::Properties;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rds.toml";

/// Platform name reserved for direct video URLs.
const RESERVED_PLATFORM: &str = "url";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix for the base classes (`<prefix>-badge`, `<prefix>-link`, `<prefix>-video`).
    pub class_prefix: String,
    /// `:::image-<tag>` options.
    pub image: ImageConfig,
    /// `::video[-<platform>]` options.
    pub video: VideoConfig,
    /// `:link` options.
    pub link: LinkConfig,
    /// `:badge[-<type>]` options.
    pub badge: BadgeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_prefix: "rds".to_owned(),
            image: ImageConfig::default(),
            video: VideoConfig::default(),
            link: LinkConfig::default(),
            badge: BadgeConfig::default(),
            config_path: None,
        }
    }
}

/// Extra directive names: a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Aliases {
    One(String),
    Many(Vec<String>),
}

impl Aliases {
    /// Aliases as a list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(alias) => vec![alias.clone()],
            Self::Many(aliases) => aliases.clone(),
        }
    }
}

/// Which images in an image container receive `img_props`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImgPropsScope {
    /// Only the first image found depth-first.
    #[default]
    First,
    /// Every image in the container.
    All,
}

/// Image container options.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub alias: Option<Aliases>,
    /// Properties merged into image elements.
    pub img_props: Option<Properties>,
    /// Which images receive `img_props`.
    pub img_props_scope: ImgPropsScope,
    /// Properties of the `figure` element.
    pub figure_props: Option<Properties>,
    /// Properties of the generated `figcaption`.
    pub figcaption_props: Option<Properties>,
    /// Properties of non-figure wrapper elements.
    pub element_props: Option<Properties>,
    /// Replace paragraphs holding a single image with the image itself.
    pub strip_paragraph: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            alias: None,
            img_props: None,
            img_props_scope: ImgPropsScope::First,
            figure_props: None,
            figcaption_props: None,
            element_props: None,
            strip_paragraph: true,
        }
    }
}

/// Video embed options.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub alias: Option<Aliases>,
    /// Properties of the iframe.
    pub iframe_props: Option<Properties>,
    /// Extra platforms: name to embed URL template with an `{id}` placeholder.
    pub platforms: BTreeMap<String, String>,
    /// Wrap the iframe in a `div`.
    pub wrapper: bool,
}

/// How the link icon is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkIcon {
    /// `span` with a `background-image` style.
    #[default]
    Background,
    /// `img` element.
    Img,
}

/// Decorated link options.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    pub alias: Option<Aliases>,
    /// Properties of the anchor.
    pub a_props: Option<Properties>,
    /// Properties of the icon element.
    pub img_props: Option<Properties>,
    /// Favicon service URL template with a `{domain}` placeholder.
    pub favicon: Option<String>,
    /// Icon element style.
    pub icon: LinkIcon,
}

/// Badge options.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    pub alias: Option<Aliases>,
    /// Properties of every badge `span`.
    pub span_props: Option<Properties>,
    /// Badge types selected with `:badge-<type>`.
    pub presets: BTreeMap<String, BadgePreset>,
    /// Color used when neither the directive nor its preset sets one.
    pub default_color: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            alias: None,
            span_props: None,
            presets: BTreeMap::new(),
            default_color: "rgb(8, 109, 221)".to_owned(),
        }
    }
}

/// A named badge variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadgePreset {
    /// Badge text.
    pub text: String,
    /// One color, or `light|dark`.
    pub color: Option<String>,
    /// Extra properties for badges of this type.
    pub props: Option<Properties>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require every alias to be non-empty.
fn require_aliases(aliases: Option<&Aliases>, field: &str) -> Result<(), ConfigError> {
    for alias in aliases.map(Aliases::to_vec).unwrap_or_default() {
        require_non_empty(&alias, field)?;
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rds.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` or `ConfigError::Validation`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for `rds.toml` in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.class_prefix, "class_prefix")?;
        require_aliases(self.image.alias.as_ref(), "image.alias")?;
        require_aliases(self.video.alias.as_ref(), "video.alias")?;
        require_aliases(self.link.alias.as_ref(), "link.alias")?;
        require_aliases(self.badge.alias.as_ref(), "badge.alias")?;
        self.validate_video()?;
        self.validate_link()?;
        self.validate_badge()?;
        Ok(())
    }

    fn validate_video(&self) -> Result<(), ConfigError> {
        if self.video.platforms.contains_key(RESERVED_PLATFORM) {
            return Err(ConfigError::Validation(format!(
                "video.platforms: the platform name `{RESERVED_PLATFORM}` is reserved"
            )));
        }
        for (name, template) in &self.video.platforms {
            if !template.contains("{id}") {
                return Err(ConfigError::Validation(format!(
                    "video.platforms.{name} must contain an {{id}} placeholder"
                )));
            }
        }
        Ok(())
    }

    fn validate_link(&self) -> Result<(), ConfigError> {
        if let Some(favicon) = &self.link.favicon {
            require_non_empty(favicon, "link.favicon")?;
        }
        Ok(())
    }

    fn validate_badge(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.badge.default_color, "badge.default_color")?;
        for (name, preset) in &self.badge.presets {
            require_non_empty(&preset.text, &format!("badge.presets.{name}.text"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rds_tree::PropertyValue;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.class_prefix, "rds");
        assert!(config.image.strip_paragraph);
        assert_eq!(config.image.img_props_scope, ImgPropsScope::First);
        assert!(!config.video.wrapper);
        assert_eq!(config.link.icon, LinkIcon::Background);
        assert_eq!(config.badge.default_color, "rgb(8, 109, 221)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.class_prefix, "rds");
        assert!(config.badge.presets.is_empty());
    }

    #[test]
    fn test_alias_string_or_list() {
        let config = Config::from_toml_str(
            r#"
[badge]
alias = "b"

[image]
alias = ["i", "img"]
"#,
        )
        .unwrap();
        assert_eq!(config.badge.alias, Some(Aliases::One("b".to_owned())));
        assert_eq!(
            config.image.alias.map(|a| a.to_vec()),
            Some(vec!["i".to_owned(), "img".to_owned()])
        );
    }

    #[test]
    fn test_parse_badge_presets() {
        let config = Config::from_toml_str(
            r##"
[badge.presets.v]
text = "VIDEO"

[badge.presets.new]
text = "NEW"
color = "#1f883d|#3fb950"
props = { class = "pill", title = "New feature" }
"##,
        )
        .unwrap();
        let presets = &config.badge.presets;
        assert_eq!(presets["v"].text, "VIDEO");
        assert_eq!(presets["v"].color, None);
        assert_eq!(presets["new"].color.as_deref(), Some("#1f883d|#3fb950"));
        assert_eq!(
            presets["new"].props.as_ref().and_then(|p| p.get("title")),
            Some(&PropertyValue::from("New feature"))
        );
    }

    #[test]
    fn test_property_value_types() {
        let config = Config::from_toml_str(
            r#"
[video.iframe_props]
width = 560
allowfullscreen = true
class = ["embed", "wide"]
loading = "lazy"
"#,
        )
        .unwrap();
        let props = config.video.iframe_props.unwrap();
        assert_eq!(props["width"], PropertyValue::Int(560));
        assert_eq!(props["allowfullscreen"], PropertyValue::Bool(true));
        assert_eq!(
            props["class"],
            PropertyValue::List(vec!["embed".to_owned(), "wide".to_owned()])
        );
        assert_eq!(props["loading"], PropertyValue::from("lazy"));
    }

    #[test]
    fn test_parse_enums() {
        let config = Config::from_toml_str(
            r#"
[image]
img_props_scope = "all"
strip_paragraph = false

[link]
icon = "img"
favicon = "https://icons.duckduckgo.com/ip3/{domain}.ico"
"#,
        )
        .unwrap();
        assert_eq!(config.image.img_props_scope, ImgPropsScope::All);
        assert!(!config.image.strip_paragraph);
        assert_eq!(config.link.icon, LinkIcon::Img);
    }

    #[test]
    fn test_reserved_video_platform_rejected() {
        let err = Config::from_toml_str(
            r#"
[video.platforms]
url = "https://example.com/{id}"
"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_platform_template_requires_placeholder() {
        let err = Config::from_toml_str(
            r#"
[video.platforms]
loom = "https://www.loom.com/embed/"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("{id}"));
    }

    #[test]
    fn test_empty_preset_text_rejected() {
        let err = Config::from_toml_str(
            r#"
[badge.presets.x]
text = ""
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("badge.presets.x.text"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("[badge]\npreset = {}\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "class_prefix = \"docs\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.class_prefix, "docs");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_ignores_directory_named_like_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILENAME)).unwrap();
        let found = Config::discover_from(dir.path());
        assert_ne!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }
}
