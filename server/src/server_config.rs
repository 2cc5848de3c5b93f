use duel_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use duel_common::games::tictactoe::BoardSettings;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "duel_server_config.yaml";
const SNAPSHOT_FILE_NAME: &str = "duel_server_snapshot.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub board: BoardSettings,
    pub snapshot_path: String,
    #[serde(default)]
    pub symbols: RenderSymbols,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.board.validate()?;
        if self.snapshot_path.trim().is_empty() {
            return Err("snapshot_path must not be empty".to_string());
        }
        self.symbols.validate()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            board: BoardSettings::default(),
            snapshot_path: SNAPSHOT_FILE_NAME.to_string(),
            symbols: RenderSymbols::default(),
        }
    }
}

/// Glyphs the console uses; `*_last` mark the most recently placed cell.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RenderSymbols {
    pub first: String,
    pub second: String,
    pub empty: String,
    pub first_last: String,
    pub second_last: String,
}

impl Validate for RenderSymbols {
    fn validate(&self) -> Result<(), String> {
        let all = [
            &self.first,
            &self.second,
            &self.empty,
            &self.first_last,
            &self.second_last,
        ];
        if all.iter().any(|symbol| symbol.is_empty()) {
            return Err("Render symbols must not be empty".to_string());
        }
        if self.first == self.second || self.first == self.empty || self.second == self.empty {
            return Err("Render symbols for first, second and empty cells must differ".to_string());
        }
        Ok(())
    }
}

impl Default for RenderSymbols {
    fn default() -> Self {
        Self {
            first: "❌".to_string(),
            second: "🔴".to_string(),
            empty: "🌫".to_string(),
            first_last: "❎".to_string(),
            second_last: "🟢".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_common::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        let random_number: u32 = rand::random();
        let mut path = std::env::temp_dir();
        path.push(format!("temp_duel_server_config_{}.yaml", random_number));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ServerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = ServerConfig::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: ServerConfig = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_config_manager_reads_file_and_validates() {
        let file_path = get_temp_file_path();
        let provider = FileContentConfigProvider::new(file_path.clone());
        provider
            .set_config_content("board:\n  width: 3\n  height: 3\n  win_length: 3\nsnapshot_path: game.yaml\n")
            .unwrap();

        let config = get_config_manager(&file_path).get_config().unwrap();
        assert_eq!(config.board, BoardSettings::new(3, 3, 3));
        assert_eq!(config.snapshot_path, "game.yaml");
        assert_eq!(config.symbols, RenderSymbols::default());

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_unplayable_board_fails_config_load() {
        let file_path = get_temp_file_path();
        let provider = FileContentConfigProvider::new(file_path.clone());
        provider
            .set_config_content("board:\n  width: 4\n  height: 2\n  win_length: 3\nsnapshot_path: game.yaml\n")
            .unwrap();

        let result = get_config_manager(&file_path).get_config();
        assert!(result.is_err());

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = get_config_manager(&get_temp_file_path()).get_config().unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_duplicate_symbols_are_rejected() {
        let symbols = RenderSymbols {
            second: "❌".to_string(),
            ..RenderSymbols::default()
        };
        assert!(symbols.validate().is_err());
    }
}
