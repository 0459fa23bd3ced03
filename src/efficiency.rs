use crate::api::{ImageSummary, LayerSummary};
use crate::error::{LayerscopeError, Result};

/// How a score reads at a glance. Thresholds are strict: 91 and up is good,
/// 81 to 90 is fair, everything else poor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
        }
    }
}

/// Percentage of the merged image's bytes accounted for by summed layer
/// contributions, rounded to the nearest integer.
///
/// The result is deliberately not clamped: layers summing above the image
/// total is backend data worth noticing, so a score over 100 is returned
/// as-is. A zero image total is an error, never a silent 0 or 100.
pub fn score(layers: &[LayerSummary], image: &ImageSummary) -> Result<u32> {
    if image.total_size == 0 {
        return Err(LayerscopeError::ZeroImageSize);
    }
    let layer_total: u64 = layers.iter().map(|layer| layer.size).sum();
    Ok((layer_total as f64 / image.total_size as f64 * 100.0).round() as u32)
}

pub fn rating(score: u32) -> Rating {
    if score > 90 {
        Rating::Good
    } else if score > 80 {
        Rating::Fair
    } else {
        Rating::Poor
    }
}

/// Layers claiming more bytes than the merged image holds.
pub fn is_anomalous(score: u32) -> bool {
    score > 100
}
