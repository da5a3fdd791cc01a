use crate::OwnerId;

/// Configuration for [`crate::VirtualizingEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineOptions {
    /// Primary-axis size assumed for unrealized elements until real measurements exist.
    pub estimated_element_size: f64,
    /// Identifies this engine to a factory shared with other engines.
    pub owner: OwnerId,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self {
            estimated_element_size: 25.0,
            owner: OwnerId::default(),
        }
    }

    pub fn with_estimated_element_size(mut self, size: f64) -> Self {
        debug_assert!(size > 0.0, "estimated_element_size must be positive");
        self.estimated_element_size = size;
        self
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = owner;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new()
    }
}
