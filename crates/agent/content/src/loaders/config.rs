//! Agent configuration loader.

use std::path::Path;

use agent_core::AgentConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for agent configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`AgentConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<AgentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    }

    /// Parse an [`AgentConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<AgentConfig> {
        let config: AgentConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.free_cast_buff.trim().is_empty() {
            anyhow::bail!("free_cast_buff must name a boolean variable");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Class;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn test_partial_layout_keeps_other_cells() {
        let config = ConfigLoader::parse(
            r#"
            class = "Druid"

            [layout]
            health = 40
            "#,
        )
        .unwrap();

        let defaults = AgentConfig::default().layout;
        assert_eq!(config.class, Class::Druid);
        assert_eq!(config.layout.health, 40);
        assert_eq!(config.layout.mana, defaults.mana);
        assert!(config.loot);
    }

    #[test]
    fn test_blank_free_cast_buff_is_rejected() {
        let err = ConfigLoader::parse("free_cast_buff = \"  \"").unwrap_err();
        assert!(err.to_string().contains("free_cast_buff"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("agent.toml");
        std::fs::write(
            &path,
            r#"
            class = "Warrior"
            loot = false
            skin = true
            blacklist = ["npcID:666", "Level > 60"]
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.class, Class::Warrior);
        assert!(!config.loot);
        assert!(config.skin);
        assert_eq!(config.blacklist, ["npcID:666", "Level > 60"]);
        assert_eq!(config.free_cast_buff, AgentConfig::DEFAULT_FREE_CAST_BUFF);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_unknown_class_fails_to_parse() {
        let err = ConfigLoader::parse("class = \"Bard\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
