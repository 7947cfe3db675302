//! Record log configuration.

/// Default byte distance between two checkpoints.
pub const DEFAULT_CHECKPOINT_SPACING: u64 = 32 * 1024;

/// Configuration for opening a record log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum number of bytes between two checkpoints in the seek index.
    ///
    /// Smaller values make seeks replay fewer frames at the cost of a larger
    /// in-memory index.
    pub checkpoint_spacing: u64,

    /// Whether a write-open creates missing parent directories.
    pub create_dirs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            checkpoint_spacing: DEFAULT_CHECKPOINT_SPACING,
            create_dirs: false,
        }
    }
}

impl LogConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checkpoint spacing. Zero is treated as one byte.
    #[must_use]
    pub const fn checkpoint_spacing(mut self, bytes: u64) -> Self {
        self.checkpoint_spacing = if bytes == 0 { 1 } else { bytes };
        self
    }

    /// Sets whether to create missing parent directories.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LogConfig::default();
        assert_eq!(config.checkpoint_spacing, 32 * 1024);
        assert!(!config.create_dirs);
    }

    #[test]
    fn builder_pattern() {
        let config = LogConfig::new().checkpoint_spacing(128).create_dirs(true);
        assert_eq!(config.checkpoint_spacing, 128);
        assert!(config.create_dirs);
    }

    #[test]
    fn zero_spacing_clamped() {
        assert_eq!(LogConfig::new().checkpoint_spacing(0).checkpoint_spacing, 1);
    }
}
