//! Pixel exact overlap test between two placed masks.
//!
//! Instead of comparing pixel by pixel, both masks are walked 32 columns at a
//! time. Since the two masks are generally not aligned to the same word grid,
//! each step rebuilds a 32 bit window from up to two neighbouring words.

use crate::{
    geometry::{intersection::bounding_boxes_touch, rect, Point},
    mask::{Mask, WORD_BITS},
};

/// The 32 mask bits covering columns `[x, x + 32)` of `row`.
///
/// Words outside the row read as zero.
pub fn window(row: &[u32], x: u32) -> u32 {
    let word_index = (x / WORD_BITS) as usize;
    let bit_shift = x % WORD_BITS;
    let word_at = |index: usize| row.get(index).copied().unwrap_or(0);

    if bit_shift == 0 {
        return word_at(word_index);
    }
    (word_at(word_index) << bit_shift) | (word_at(word_index + 1) >> (WORD_BITS - bit_shift))
}

/// Checks whether any pixel visible in `this` shares its position with a
/// pixel visible in `other`.
pub fn masks_overlap(this: &Mask, this_origin: Point, other: &Mask, other_origin: Point) -> bool {
    let this_bounds = rect(this_origin.x, this_origin.y, this.width(), this.height());
    let other_bounds = rect(other_origin.x, other_origin.y, other.width(), other.height());
    if !bounding_boxes_touch(this_bounds, other_bounds) {
        return false;
    }

    // The bounding box check keeps both offsets within the sizes, so the
    // start coordinates fit in u32.
    let offset_x = other_origin.x as i64 - this_origin.x as i64;
    let offset_y = other_origin.y as i64 - this_origin.y as i64;
    let this_start_x = offset_x.max(0) as u32;
    let this_start_y = offset_y.max(0) as u32;
    let other_start_x = (-offset_x).max(0) as u32;
    let other_start_y = (-offset_y).max(0) as u32;

    let rows = (this_start_y..this.height()).zip(other_start_y..other.height());
    for (this_y, other_y) in rows {
        let this_row = this.row(this_y);
        let other_row = other.row(other_y);

        let columns = (this_start_x..this.width())
            .step_by(WORD_BITS as usize)
            .zip((other_start_x..other.width()).step_by(WORD_BITS as usize));
        for (this_x, other_x) in columns {
            if window(this_row, this_x) & window(other_row, other_x) != 0 {
                log::trace!(
                    "Overlap found at ({}, {})",
                    this_origin.x as i64 + this_x as i64,
                    this_origin.y as i64 + this_y as i64
                );
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{dimension, point},
        mask::tests::mask_from_art,
    };

    #[parameterized(
        x = { 0, 32, 64, 96 },
        expected = { 0xAAAA_0000, 0x0000_FFFF, 0x8000_0001, 0 }
    )]
    fn aligned_window_is_the_raw_word(x: u32, expected: u32) {
        let row = [0xAAAA_0000, 0x0000_FFFF, 0x8000_0001];
        assert_eq!(window(&row, x), expected);
        assert_eq!(window(&row, x), window(&row, x));
    }

    #[parameterized(
        x = { 4, 16, 31, 33, 65 },
        expected = { 0xAAA0_0000, 0x0000_0000, 0x0000_7FFF, 0x0001_FFFF, 0x0000_0002 }
    )]
    fn unaligned_window_merges_neighbouring_words(x: u32, expected: u32) {
        let row = [0xAAAA_0000, 0x0000_FFFF, 0x8000_0001];
        assert_eq!(window(&row, x), expected);
    }

    #[test]
    fn window_straddling_the_word_boundary() {
        let row = [0x0000_000F, 0xF000_0000];
        assert_eq!(window(&row, 28), 0xFF00_0000);
    }

    #[test]
    fn window_of_empty_row_is_zero() {
        assert_eq!(window(&[], 0), 0);
        assert_eq!(window(&[], 7), 0);
    }

    #[test]
    fn visible_pixels_meeting_across_word_boundary() {
        // this:  pixel 35 visible, origin 0
        // other: pixel 5 visible, origin 30, lands on global 35
        let mut this_art = "_".repeat(40);
        this_art.replace_range(35..36, "█");
        let this = mask_from_art(&[&this_art]);
        let other = mask_from_art(&["_____█____"]);

        assert!(masks_overlap(&this, point(0, 0), &other, point(30, 0)));
        assert!(!masks_overlap(&this, point(0, 0), &other, point(29, 0)));
    }

    #[test]
    fn edge_sharing_boxes_do_not_overlap() {
        let this = Mask::filled(dimension(4, 4));
        let other = Mask::filled(dimension(4, 4));
        assert!(!masks_overlap(&this, point(0, 0), &other, point(4, 0)));
        assert!(!masks_overlap(&this, point(0, 0), &other, point(0, -4)));
    }

    #[test]
    fn single_pixel_overlap_of_opaque_masks() {
        let this = Mask::filled(dimension(4, 4));
        let other = Mask::filled(dimension(4, 4));
        assert!(masks_overlap(&this, point(0, 0), &other, point(3, 3)));
        assert!(masks_overlap(&this, point(0, 0), &other, point(-3, -3)));
    }

    #[test]
    fn disjoint_shapes_inside_overlapping_boxes() {
        //   0 1 2 3
        // 0 █ █ _ _     this
        // 1 █ _ _ _
        // 2 _ _ _ _
        //
        //   0 1 2 3
        // 0 _ _ _ _     other, shifted by (1, 1)
        // 1 _ _ _ _
        // 2 _ _ _ █
        let this = mask_from_art(&["██__", "█___", "____"]);
        let other = mask_from_art(&["____", "____", "___█"]);

        assert!(!masks_overlap(&this, point(0, 0), &other, point(1, 1)));
        assert!(masks_overlap(&this, point(0, 0), &other, point(-3, -2)));
    }

    #[test]
    fn wide_masks_are_scanned_past_the_first_word() {
        let mut art = "_".repeat(100);
        art.replace_range(90..91, "█");
        let this = mask_from_art(&[&art]);
        let other = mask_from_art(&[&art]);

        assert!(masks_overlap(&this, point(0, 0), &other, point(0, 0)));
        assert!(!masks_overlap(&this, point(0, 0), &other, point(1, 0)));
        assert!(!masks_overlap(&this, point(0, 0), &other, point(-7, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let this = mask_from_art(&["_██_", "████", "_██_"]);
        let other = mask_from_art(&["█____", "_____", "____█"]);
        for dy in -4..=4 {
            for dx in -6..=6 {
                let forward = masks_overlap(&this, point(0, 0), &other, point(dx, dy));
                let backward = masks_overlap(&other, point(dx, dy), &this, point(0, 0));
                assert_eq!(forward, backward, "offset ({}, {})", dx, dy);
            }
        }
    }

    #[test]
    fn empty_masks_never_overlap() {
        let this = Mask::filled(dimension(0, 0));
        let other = Mask::filled(dimension(8, 8));
        assert!(!masks_overlap(&this, point(2, 2), &other, point(0, 0)));
    }
}
