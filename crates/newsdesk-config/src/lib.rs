use newsdesk_engine::editing::EditorSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding article documents as `*.json` files.
    pub articles_path: PathBuf,
    /// Editor options, read by editor hosts and reported by `newsdesk tools`.
    #[serde(default)]
    pub editor: EditorSettings,
}

impl Config {
    pub fn new(articles_path: impl Into<PathBuf>) -> Self {
        Self {
            articles_path: articles_path.into(),
            editor: EditorSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded articles path
        config.articles_path =
            Self::expand_path(&config.articles_path).unwrap_or(config.articles_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/newsdesk");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_engine::document::ListStyle;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/newsdesk/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = Config::new("/tmp/test-articles");
        original.editor.read_only = true;
        original.editor.tools.video = None;

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_editor_section_defaults_when_absent() {
        let config: Config = toml::from_str(r#"articles_path = "/srv/articles""#).unwrap();

        assert_eq!(config.editor, EditorSettings::default());
        assert_eq!(config.editor.placeholder, "Write news content here…");
        let header = config.editor.tools.header.unwrap();
        assert_eq!(header.levels, vec![2, 3, 4]);
        assert_eq!(header.default_level, 2);
        assert_eq!(
            config.editor.tools.link_preview.unwrap().endpoint,
            "/api/link-preview"
        );
    }

    #[test]
    fn test_tools_table_enables_only_listed_tools() {
        let config_content = r#"
articles_path = "/srv/articles"

[editor]
min_height = 300

[editor.tools.header]
levels = [2, 3]

[editor.tools.list]
default_style = "ordered"

[editor.tools.video]
confirm_delay_ms = 250
"#;

        let config: Config = toml::from_str(config_content).unwrap();
        let tools = &config.editor.tools;

        assert_eq!(config.editor.min_height, 300);
        assert!(config.editor.autofocus);
        assert_eq!(tools.header.as_ref().unwrap().levels, vec![2, 3]);
        assert_eq!(tools.list.as_ref().unwrap().default_style, ListStyle::Ordered);
        assert_eq!(tools.video.as_ref().unwrap().confirm_delay_ms, 250);
        assert!(tools.paragraph.is_none());
        assert!(tools.quote.is_none());
        assert!(tools.link_preview.is_none());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("NEWSDESK_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$NEWSDESK_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("NEWSDESK_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "articles_path = [").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config::new("/tmp/test-articles");

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_articles_path_is_expanded_on_load() {
        unsafe {
            env::set_var("NEWSDESK_ARTICLES_ROOT", "/custom/articles");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "articles_path = \"$NEWSDESK_ARTICLES_ROOT/2024\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.articles_path, PathBuf::from("/custom/articles/2024"));

        unsafe {
            env::remove_var("NEWSDESK_ARTICLES_ROOT");
        }
    }
}
