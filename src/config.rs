use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display order for the layer table, keyed on root directory id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerOrder {
    Ascending,
    Descending,
}

impl Default for LayerOrder {
    fn default() -> Self {
        LayerOrder::Ascending
    }
}

/// Explicit presentation settings, handed to the UI instead of living in
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub layer_order: LayerOrder,
    /// Show the color swatch column in the explorer listing.
    pub show_legend: bool,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layer_order: LayerOrder::default(),
            show_legend: true,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
