//! Ephemeral per-client device identity.

use tracing::{debug, instrument};

/// Random identifier generated once per client process.
///
/// A device id binds a client to its assigned mark inside a room's
/// `players` mapping. It is never persisted across restarts, so a
/// restarted client is a new device as far as the room is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Generates a fresh random device identifier.
    #[instrument]
    pub fn generate() -> Self {
        let raw: u128 = rand::random();
        let id = Self(format!("{raw:032x}"));
        debug!(device_id = %id, "Generated device identifier");
        id
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = DeviceId::generate();
        let b = DeviceId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_is_hex_of_fixed_width() {
        let id = DeviceId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
