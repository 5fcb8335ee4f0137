//! Element geometry.

/// [Geometry Interfaces § 6 DOMRect](https://drafts.fxtf.org/geometry/#DOMRect)
///
/// "Objects implementing the DOMRectReadOnly interface represent a rectangle."
/// Coordinates are in CSS pixels relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DomRect {
    /// "The x coordinate"
    pub x: f32,
    /// "The y coordinate"
    pub y: f32,
    /// "The width dimension"
    pub width: f32,
    /// "The height dimension"
    pub height: f32,
}

impl DomRect {
    /// Create a rectangle from its origin and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The bottom edge, `y + height`.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}
