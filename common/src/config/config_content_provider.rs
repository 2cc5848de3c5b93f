use std::io::ErrorKind;
use std::path::PathBuf;

/// Raw text storage behind a config or snapshot file.
pub trait ConfigContentProvider {
    /// `Ok(None)` means nothing has been stored yet.
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct FileContentConfigProvider {
    file_path: PathBuf,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!(
                "Failed to read {}: {}",
                self.file_path.display(),
                err
            )),
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        // Write-then-rename so a crash mid-write never leaves a truncated file behind.
        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .map_err(|e| format!("Failed to write {}: {}", tmp_path.display(), e))?;
        std::fs::rename(&tmp_path, &self.file_path)
            .map_err(|e| format!("Failed to replace {}: {}", self.file_path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_duel_provider_{}.yaml", random_number))
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let provider = FileContentConfigProvider::new(get_temp_file_path());
        assert_eq!(provider.get_config_content(), Ok(None));
    }

    #[test]
    fn test_written_content_reads_back() {
        let path = get_temp_file_path();
        let provider = FileContentConfigProvider::new(path.clone());

        provider.set_config_content("board:\n  width: 3\n").unwrap();
        let content = provider.get_config_content().unwrap();
        assert_eq!(content.as_deref(), Some("board:\n  width: 3\n"));

        provider.set_config_content("second").unwrap();
        assert_eq!(provider.get_config_content().unwrap().as_deref(), Some("second"));

        let _ = std::fs::remove_file(path);
    }
}
