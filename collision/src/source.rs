//! Pixel sources that masks are built from.

use crate::geometry::{dimension, Dimension};
use std::{
    borrow::Cow,
    fmt,
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

/// Identity of a pixel source, used as the mask cache key.
///
/// Ids are handed out from a process-wide counter and are never reused, two
/// sources with identical pixels still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(0);

impl SourceId {
    pub fn new() -> Self {
        SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Something that can hand out RGBA8 pixels for its whole extent.
pub trait PixelSource {
    fn id(&self) -> SourceId;

    fn dimension(&self) -> Dimension;

    /// Row-major RGBA bytes, `width * height * 4` of them.
    fn rgba(&self) -> Cow<'_, [u8]>;
}

#[derive(Debug)]
pub enum SourceError {
    BufferSizeMismatch { expected: usize, actual: usize },
    Image(image::ImageError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::BufferSizeMismatch { expected, actual } => write!(
                f,
                "pixel buffer holds {} bytes, expected {}",
                actual, expected
            ),
            SourceError::Image(e) => write!(f, "could not load image: {}", e),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::BufferSizeMismatch { .. } => None,
            SourceError::Image(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for SourceError {
    fn from(e: image::ImageError) -> Self {
        SourceError::Image(e)
    }
}

/// Raw pixel buffer already laid out as RGBA8.
#[derive(Debug)]
pub struct RgbaBuffer {
    id: SourceId,
    dimension: Dimension,
    data: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SourceError> {
        let expected = dimension(width, height).area() * 4;
        if data.len() != expected {
            return Err(SourceError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(RgbaBuffer {
            id: SourceId::new(),
            dimension: dimension(width, height),
            data,
        })
    }

    /// A buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(dimension(width, height).area() * 4)
            .collect();
        RgbaBuffer {
            id: SourceId::new(),
            dimension: dimension(width, height),
            data,
        }
    }
}

impl PixelSource for RgbaBuffer {
    fn id(&self) -> SourceId {
        self.id
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn rgba(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }
}

/// Decoded image, converted to RGBA8 up front.
#[derive(Debug)]
pub struct ImageSource {
    id: SourceId,
    image: image::RgbaImage,
}

impl ImageSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let image = image::open(path)?;
        log::info!("Loaded image \"{}\"", path.display());
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: image::DynamicImage) -> Self {
        ImageSource {
            id: SourceId::new(),
            image: image.to_rgba8(),
        }
    }
}

impl PixelSource for ImageSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn dimension(&self) -> Dimension {
        dimension(self.image.width(), self.image.height())
    }

    fn rgba(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.image.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = SourceId::new();
        let b = SourceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn identical_buffers_have_distinct_identities() {
        let a = RgbaBuffer::filled(2, 2, [255, 0, 0, 255]);
        let b = RgbaBuffer::filled(2, 2, [255, 0, 0, 255]);
        assert_eq!(a.rgba(), b.rgba());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn buffer_size_is_checked() {
        let result = RgbaBuffer::new(2, 2, vec![0; 15]);
        assert!(matches!(
            result,
            Err(SourceError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn filled_buffer_repeats_color() {
        let buffer = RgbaBuffer::filled(3, 1, [1, 2, 3, 4]);
        assert_eq!(&buffer.rgba()[..], &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(buffer.dimension(), dimension(3, 1));
    }

    #[test]
    fn image_source_converts_to_rgba() {
        let mut gray = image::GrayImage::new(2, 1);
        gray.put_pixel(1, 0, image::Luma([200]));
        let source = ImageSource::from_image(image::DynamicImage::ImageLuma8(gray));

        assert_eq!(source.dimension(), dimension(2, 1));
        assert_eq!(&source.rgba()[..], &[0, 0, 0, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn missing_image_file_is_an_error() {
        let result = ImageSource::open(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(SourceError::Image(_))));
    }
}
