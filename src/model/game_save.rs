use serde::{Deserialize, Serialize};

/// Versioned wrapper around every persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}
