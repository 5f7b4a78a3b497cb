//! Packed visibility masks.
//!
//! A mask stores one bit per pixel, row-major, in 32-bit words. Within a word
//! the most significant bit is the leftmost pixel of the 32 pixel group. The
//! last word of a row is zero padded in its low bits when the width is not a
//! multiple of 32.

use crate::geometry::Dimension;
use serde::{Deserialize, Serialize};

/// Number of pixels packed into one mask word.
pub const WORD_BITS: u32 = u32::BITS;

const LEFTMOST_BIT: u32 = 1 << (WORD_BITS - 1);

/// Decides whether an RGBA pixel counts as visible.
pub type PixelTest = Box<dyn Fn(u8, u8, u8, u8) -> bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMask")]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    words: Vec<u32>,
}

/// Unchecked mask fields as read from a serialized mask.
#[derive(Deserialize)]
struct RawMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    words: Vec<u32>,
}

impl TryFrom<RawMask> for Mask {
    type Error = String;

    fn try_from(raw: RawMask) -> Result<Self, Self::Error> {
        let words_per_row = words_for_width(raw.width);
        if raw.words_per_row != words_per_row {
            return Err(format!(
                "{} words per row given for width {}, expected {}",
                raw.words_per_row, raw.width, words_per_row
            ));
        }
        if raw.words.len() != words_per_row * raw.height as usize {
            return Err(format!(
                "{} words given for {} rows of {}",
                raw.words.len(),
                raw.height,
                words_per_row
            ));
        }
        let used_bits = raw.width % WORD_BITS;
        if used_bits != 0 {
            let padding = u32::MAX >> used_bits;
            let mut rows = raw.words.chunks(words_per_row);
            if let Some(y) = rows.position(|row| row[words_per_row - 1] & padding != 0) {
                return Err(format!("row {} has bits set past width {}", y, raw.width));
            }
        }
        Ok(Mask {
            width: raw.width,
            height: raw.height,
            words_per_row,
            words: raw.words,
        })
    }
}

/// Visible iff the pixel is neither black nor fully transparent.
pub fn default_pixel_test(r: u8, g: u8, b: u8, a: u8) -> bool {
    (r as u32 + g as u32 + b as u32) > 0 && a > 0
}

/// Number of words needed to hold `width` pixels, `ceil(width / 32)`.
pub fn words_for_width(width: u32) -> usize {
    ((width as usize) + WORD_BITS as usize - 1) / WORD_BITS as usize
}

/// Builds a mask by scanning every row left to right and asking
/// `pixel_test` about each pixel returned by `pixel_at`.
pub fn build_mask<P, T>(dimension: Dimension, pixel_at: P, pixel_test: T) -> Mask
where
    P: Fn(u32, u32) -> [u8; 4],
    T: Fn(u8, u8, u8, u8) -> bool,
{
    let words_per_row = words_for_width(dimension.width);
    let mut words = Vec::with_capacity(words_per_row * dimension.height as usize);

    for y in 0..dimension.height {
        let mut word = 0;
        let mut next_bit = LEFTMOST_BIT;
        for x in 0..dimension.width {
            let [r, g, b, a] = pixel_at(x, y);
            if pixel_test(r, g, b, a) {
                word |= next_bit;
            }
            next_bit >>= 1;
            if next_bit == 0 {
                words.push(word);
                word = 0;
                next_bit = LEFTMOST_BIT;
            }
        }
        // partially filled word at the end of the row
        if next_bit != LEFTMOST_BIT {
            words.push(word);
        }
    }

    debug_assert_eq!(words.len(), words_per_row * dimension.height as usize);
    log::trace!(
        "Built {}x{} mask ({} words per row)",
        dimension.width,
        dimension.height,
        words_per_row
    );

    Mask {
        width: dimension.width,
        height: dimension.height,
        words_per_row,
        words,
    }
}

/// Builds a mask from row-major RGBA8 bytes, 4 bytes per pixel.
///
/// Pixels missing from a short buffer read as transparent black.
pub fn build_mask_from_rgba<T>(dimension: Dimension, rgba: &[u8], pixel_test: T) -> Mask
where
    T: Fn(u8, u8, u8, u8) -> bool,
{
    let pixel_at = |x: u32, y: u32| {
        let index = (y as usize * dimension.width as usize + x as usize) * 4;
        match rgba.get(index..index + 4) {
            Some(&[r, g, b, a]) => [r, g, b, a],
            _ => [0, 0, 0, 0],
        }
    };
    build_mask(dimension, pixel_at, pixel_test)
}

impl Mask {
    /// A mask of the given size with no visible pixels.
    pub fn empty(dimension: Dimension) -> Self {
        build_mask(dimension, |_, _| [0, 0, 0, 0], |_, _, _, _| false)
    }

    /// A mask of the given size where every pixel is visible.
    pub fn filled(dimension: Dimension) -> Self {
        build_mask(dimension, |_, _| [0, 0, 0, 0], |_, _, _, _| true)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimension(&self) -> Dimension {
        Dimension {
            width: self.width,
            height: self.height,
        }
    }

    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    /// The packed words of row `y`. Rows past the bottom edge are empty.
    pub fn row(&self, y: u32) -> &[u32] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.height).map(move |y| self.row(y))
    }

    pub fn is_visible(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.row(y)[(x / WORD_BITS) as usize];
        word & (LEFTMOST_BIT >> (x % WORD_BITS)) != 0
    }

    pub fn count_visible(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }
}
