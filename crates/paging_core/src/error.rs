use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("page size must be a positive integer, got {0}")]
    InvalidPageSize(u32),
    #[error("event channel capacity must be greater than zero")]
    InvalidEventCapacity,
}
