//! Plain-data building blocks shared by every chart layout.

use serde::Serialize;

/// Horizontal anchoring of a text label relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Text starts at the position and extends to the right.
    Start,
    /// Text is centered on the position.
    #[default]
    Middle,
    /// Text ends at the position.
    End,
}

impl TextAnchor {
    /// Picks an anchor for a label at normalized position `t`.
    ///
    /// Labels within `threshold` of either edge are anchored to that edge so
    /// they stay on the canvas.
    ///
    /// ```
    /// use bioscale::TextAnchor;
    ///
    /// assert_eq!(TextAnchor::for_position(0.02, 0.05), TextAnchor::Start);
    /// assert_eq!(TextAnchor::for_position(0.50, 0.05), TextAnchor::Middle);
    /// assert_eq!(TextAnchor::for_position(0.99, 0.05), TextAnchor::End);
    /// ```
    pub fn for_position(t: f64, threshold: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t < threshold {
            Self::Start
        } else if t > 1.0 - threshold {
            Self::End
        } else {
            Self::Middle
        }
    }
}

/// Text measurement supplied by the rendering backend.
///
/// Layouts only decide placement given a width; they never measure glyphs.
pub trait TextMetrics {
    /// Width of `text` in pixels.
    fn text_width(&self, text: &str) -> f64;
}

/// Fixed per-character width estimate, for backends without real metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidth(pub f64);

impl TextMetrics for CharWidth {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.0
    }
}
