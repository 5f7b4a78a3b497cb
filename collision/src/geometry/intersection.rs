use super::Rect;

/// Inclusive on all four edges.
pub fn point_is_inside_rect(point_x: i64, point_y: i64, rect: Rect) -> bool {
    let rect_x0 = rect.x as i64;
    let rect_y0 = rect.y as i64;
    let rect_x1 = rect_x0 + rect.w as i64;
    let rect_y1 = rect_y0 + rect.h as i64;

    let horizontal_overlap = rect_x0 <= point_x && point_x <= rect_x1;
    let vertical_overlap = rect_y0 <= point_y && point_y <= rect_y1;

    horizontal_overlap && vertical_overlap
}

/// Checks whether `other` lies within reach of `this`, i.e. whether the
/// offset `other - this` falls in `[-other.w, this.w] x [-other.h, this.h]`.
///
/// The bounds are inclusive, so boxes that only share an edge still pass and
/// yield an empty overlap region further down the line.
pub fn bounding_boxes_touch(this: Rect, other: Rect) -> bool {
    let offset_x = other.x as i64 - this.x as i64;
    let offset_y = other.y as i64 - this.y as i64;

    // Minkowski difference of the two boxes, anchored at the origin
    let x0 = -(other.w as i64);
    let y0 = -(other.h as i64);
    let x1 = this.w as i64;
    let y1 = this.h as i64;

    x0 <= offset_x && offset_x <= x1 && y0 <= offset_y && offset_y <= y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect;

    #[test]
    fn point_outside_rect() {
        //   0 1 2 3
        // 0 ┌───┐
        // 1 │   │ o
        // 2 └───┘
        let rect = rect(0, 0, 2, 2);
        assert!(!point_is_inside_rect(3, 1, rect))
    }

    #[test]
    fn point_on_rect_side() {
        //   0 1 2 3
        // 0 ┌───┐
        // 1 │   o
        // 2 └───┘
        let rect = rect(0, 0, 2, 2);
        assert!(point_is_inside_rect(2, 1, rect))
    }

    #[test]
    fn point_inside_rect() {
        //   0 1 2 3
        // 0 ┌───┐
        // 1 │ o │
        // 2 └───┘
        let rect = rect(0, 0, 2, 2);
        assert!(point_is_inside_rect(1, 1, rect))
    }

    #[parameterized(
        other = {
            rect(1, 1, 2, 2),
            rect(4, 0, 2, 2),
            rect(-2, 0, 2, 2),
            rect(0, 4, 2, 2),
            rect(0, -2, 2, 2),
        },
        expected = { true, true, true, true, true }
    )]
    fn boxes_overlapping_or_sharing_an_edge_touch(other: Rect, expected: bool) {
        //   0 1 2 3 4 5
        // 0 ┌───────┐
        // 1 │ this  │
        // 2 │       │
        // 3 │       │
        // 4 └───────┘
        let this = rect(0, 0, 4, 4);
        assert_eq!(bounding_boxes_touch(this, other), expected);
    }

    #[parameterized(
        other = {
            rect(5, 0, 2, 2),
            rect(-3, 0, 2, 2),
            rect(0, 5, 2, 2),
            rect(0, -3, 2, 2),
        },
        expected = { false, false, false, false }
    )]
    fn separated_boxes_do_not_touch(other: Rect, expected: bool) {
        let this = rect(0, 0, 4, 4);
        assert_eq!(bounding_boxes_touch(this, other), expected);
    }

    #[test]
    fn extreme_origins_do_not_overflow() {
        let this = rect(i32::MIN, i32::MIN, 8, 8);
        let other = rect(i32::MAX, i32::MAX, 8, 8);
        assert!(!bounding_boxes_touch(this, other));
        assert!(!bounding_boxes_touch(other, this));
    }
}
