//! Body box geometry

/// Layout box of the document body, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Zero-sized rect at the origin
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// No area at all, as for the body of a collapsed frame
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}
