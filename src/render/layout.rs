//! Layout math for single parts and left-to-right part rows.
//!
//! Divisions floor towards negative infinity so an image larger than the
//! window is offset symmetrically rather than biased to one side.

use smallvec::SmallVec;

use crate::geometry::{Point, Size};

/// Inline capacity covering a head, a default train of bodies and a tail.
pub type Positions = SmallVec<[Point; 8]>;

/// Top-left that centers `image` inside `window`.
pub fn centered_origin(window: Size, image: Size) -> Point {
    Point::new(
        (window.w - image.w).div_euclid(2),
        (window.h - image.h).div_euclid(2),
    )
}

/// Draw position for a part: a placement at the origin means "unset" and
/// centers the image in the window; any other placement is literal.
pub fn resolve_placement(placement: Point, window: Size, image: Size) -> Point {
    if placement.is_origin() {
        centered_origin(window, image)
    } else {
        placement
    }
}

/// Positions for parts laid out left to right with no gaps, the whole row
/// centered horizontally and each part centered vertically on its own height.
pub fn row_positions(sizes: &[Size], window: Size) -> Positions {
    let total_width: i32 = sizes.iter().map(|s| s.w).sum();
    let mut x = (window.w - total_width).div_euclid(2);
    sizes
        .iter()
        .map(|size| {
            let pos = Point::new(x, (window.h - size.h).div_euclid(2));
            x += size.w;
            pos
        })
        .collect()
}
