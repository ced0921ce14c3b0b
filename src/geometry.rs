/// Geometry primitives for pixel-shape path generation.
///
/// This module provides the small value types the path generators emit and
/// consume: [`Size`], [`Rect`] and [`RoundedRect`], all in `f64` output-space
/// coordinates, plus [`GeometryParams`], the per-generator styling parameters.
use serde::{Deserialize, Serialize};

/// A width/height pair in output-space units.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either extent is zero or negative.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    /// Shrinks the rectangle by `d` units on each side.
    ///
    /// A collapse (when `d` is at least half of an extent) clamps that extent
    /// to zero at the rectangle's center rather than going negative.
    pub fn inset_by(self, d: f64) -> Self {
        let width = (self.width - 2.0 * d).max(0.0);
        let height = (self.height - 2.0 * d).max(0.0);
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }

    /// Returns `true` if the interiors of the two rectangles overlap.
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(self, other: Rect) -> bool {
        self.x < other.max_x() &&
            other.x < self.max_x() &&
            self.y < other.max_y() &&
            other.y < self.max_y()
    }

    pub fn contains_point(self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.max_x() && py >= self.y && py < self.max_y()
    }
}

/// A rectangle with uniformly rounded corners — the output primitive of every
/// pixel-shape path generator.
///
/// # Example
///
/// ```rust
/// use qrpath::geometry::{Rect, RoundedRect};
///
/// let shape = RoundedRect::new(Rect::new(40.0, 20.0, 20.0, 60.0), 10.0);
/// assert!(shape.contains_point(50.0, 50.0));
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct RoundedRect {
    pub rect: Rect,
    pub corner_radius: f64,
}

impl RoundedRect {
    pub const fn new(rect: Rect, corner_radius: f64) -> Self {
        Self { rect, corner_radius }
    }

    /// Returns `true` if the point lies inside the rounded rectangle.
    ///
    /// The effective radius is capped at half the smaller extent, so a radius
    /// of `width / 2` on a square tests against the inscribed circle.
    pub fn contains_point(self, px: f64, py: f64) -> bool {
        if !self.rect.contains_point(px, py) {
            return false;
        }
        let r = self.corner_radius
            .min(self.rect.width / 2.0)
            .min(self.rect.height / 2.0);
        if r <= 0.0 {
            return true;
        }
        // Corner centers of the four quarter-circles.
        let cx0 = self.rect.x + r;
        let cx1 = self.rect.max_x() - r;
        let cy0 = self.rect.y + r;
        let cy1 = self.rect.max_y() - r;
        let cx = if px < cx0 { cx0 } else if px > cx1 { cx1 } else { return true };
        let cy = if py < cy0 { cy0 } else if py > cy1 { cy1 } else { return true };
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    }
}

/// Styling parameters shared by pixel-shape path generators.
///
/// Both fields are validated when constructed through [`GeometryParams::new`]:
/// `inset` is clamped to be non-negative and `corner_radius_fraction` to the
/// range [0, 1]. Values written later through a generator's settings surface
/// bypass this clamp (see [`crate::shape::PixelShape::set_setting`]).
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryParams {
    /// Distance each emitted rectangle is shrunk inward, per side, in
    /// output-space units.
    pub inset: f64,
    /// Corner radius as a fraction of half the emitted rectangle's width,
    /// 0 = square corners, 1 = fully rounded.
    pub corner_radius_fraction: f64,
}

impl GeometryParams {
    pub fn new(inset: f64, corner_radius_fraction: f64) -> Self {
        Self {
            inset: inset.max(0.0),
            corner_radius_fraction: corner_radius_fraction.clamp(0.0, 1.0),
        }
    }

    /// Corner radius for an emitted rectangle of the given (already inset)
    /// width, clamped so a collapsed rectangle never yields a negative radius.
    pub fn corner_radius_for(self, width: f64) -> f64 {
        ((width / 2.0) * self.corner_radius_fraction).max(0.0)
    }
}
