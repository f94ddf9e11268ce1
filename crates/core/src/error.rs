#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Slot table capacity must be non-zero")]
    EmptySlotTable,

    #[error("Slot index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("Node id {0} outside addressable range 1..=127")]
    InvalidNodeId(u8),

    #[error("Node id {0} is already monitored by another slot")]
    DuplicateNodeId(u8),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Subscription slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },
}
