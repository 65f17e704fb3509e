//! Store configuration.

/// Settings for a [`MemoryStore`](crate::MemoryStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the bounded command channel to the store task. Callers
    /// wait when it is full.
    pub command_channel_size: usize,

    /// Per-room notification buffer. A subscriber that falls further
    /// behind than this skips ahead to the newest records.
    pub notify_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            command_channel_size: 64,
            notify_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.command_channel_size, 64);
        assert_eq!(config.notify_capacity, 64);
    }
}
