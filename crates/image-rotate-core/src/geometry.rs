//! Overlay placement relative to a possibly rotated image.
//!
//! The overlay lives in the coordinate space of the editor's container. It
//! is placed in three steps:
//!
//! 1. Recenter the image inside its own layout box. A CSS rotation leaves
//!    the layout box at the intrinsic size while the rendered box is the
//!    rotated one, so the image gets a margin of half the difference on
//!    each axis.
//! 2. Re-measure the image. The margin moves the rendered box, so any
//!    measurement taken before step 1 is stale.
//! 3. Place the overlay at the image's rendered top-left in container
//!    coordinates (plus container scroll, minus one pixel for the
//!    container border). Quarter turns swap the overlay footprint.
//!
//! The functions here are pure; the controller performs the DOM reads and
//! writes between them.

use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;
use crate::style::{px, StyleMap};

/// Horizontal correction for the container's border pixel.
pub const CONTAINER_BORDER_CORRECTION: f64 = 1.0;

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Swap width and height.
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// A bounding client rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Scroll position of a container (`scrollLeft`, `scrollTop`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Margin that recenters an image's content inside its layout box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margin {
    /// Horizontal margin (left and right)
    pub x: f64,
    /// Vertical margin (top and bottom)
    pub y: f64,
}

impl Margin {
    /// CSS shorthand, vertical first: `"{y}px {x}px"`.
    pub fn to_css(self) -> String {
        format!("{} {}", px(self.y), px(self.x))
    }
}

/// Compute the recentering margin from intrinsic and rendered sizes.
///
/// Each axis gets half the difference between the rendered box and the
/// intrinsic size. The result is negative on an axis where the rendered box
/// is smaller.
pub fn recenter_margin(intrinsic: Size, rendered: Size) -> Margin {
    Margin {
        x: (rendered.width - intrinsic.width) / 2.0,
        y: (rendered.height - intrinsic.height) / 2.0,
    }
}

/// Overlay footprint for an image of `intrinsic` size at `rotation`.
///
/// At 90° and 270° the overlay is as wide as the image is tall.
pub fn overlay_footprint(rotation: Rotation, intrinsic: Size) -> Size {
    if rotation.is_quarter_turn() {
        intrinsic.transposed()
    } else {
        intrinsic
    }
}

/// Where the overlay goes, in container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayPlacement {
    /// Inline styles for the overlay element.
    pub fn to_styles(self) -> StyleMap {
        let mut styles = StyleMap::new();
        styles.insert("width", px(self.width));
        styles.insert("height", px(self.height));
        styles.insert("left", px(self.left));
        styles.insert("top", px(self.top));
        styles
    }
}

/// Place the overlay over an image.
///
/// `image_rect` must be measured after the recentering margin has been
/// applied.
pub fn overlay_placement(
    rotation: Rotation,
    intrinsic: Size,
    image_rect: Rect,
    container_rect: Rect,
    scroll: ScrollOffset,
) -> OverlayPlacement {
    let footprint = overlay_footprint(rotation, intrinsic);
    OverlayPlacement {
        left: image_rect.left - container_rect.left - CONTAINER_BORDER_CORRECTION + scroll.left,
        top: image_rect.top - container_rect.top + scroll.top,
        width: footprint.width,
        height: footprint.height,
    }
}
