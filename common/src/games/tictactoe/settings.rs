use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
}

impl BoardSettings {
    pub fn new(width: usize, height: usize, win_length: usize) -> Self {
        Self {
            width,
            height,
            win_length,
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            win_length: 5,
        }
    }
}

impl Validate for BoardSettings {
    fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Board dimensions must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.win_length == 0 {
            return Err("win_length must be at least 1".to_string());
        }
        if !Board::validate(self.width, self.height, self.win_length) {
            return Err(format!(
                "win_length ({}) cannot exceed minimum dimension ({})",
                self.win_length,
                self.width.min(self.height)
            ));
        }
        Ok(())
    }
}
