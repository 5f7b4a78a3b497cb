use crate::{
    cache::MaskCache,
    config::CollisionConfig,
    geometry::{intersection::point_is_inside_rect, point, rect, Dimension, Point, Rect},
    mask::{build_mask_from_rgba, default_pixel_test, Mask, PixelTest},
    overlap::masks_overlap,
    source::PixelSource,
};
use glam::Vec2;
use std::rc::Rc;

/// A mask placed somewhere in world space.
///
/// A collider starts out unplaced and only collides with anything once
/// [`Collider::set_pos`] has been called.
#[derive(Debug, Clone)]
pub struct Collider {
    mask: Rc<Mask>,
    anchor: Vec2,
    origin: Option<Point>,
}

/// Builds colliders and owns the state shared between them: the pixel test
/// used for new masks and the cache of masks already built.
pub struct CollisionSystem {
    pixel_test: PixelTest,
    cache: MaskCache,
}

impl Collider {
    pub fn from_mask(mask: Rc<Mask>) -> Self {
        Collider {
            mask,
            anchor: Vec2::ZERO,
            origin: None,
        }
    }

    /// Normalized point within the sprite that `set_pos` positions. Values
    /// outside `0..=1` are allowed.
    pub fn set_anchor(&mut self, x: f32, y: f32) {
        self.anchor = Vec2::new(x, y);
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Places the anchor point of the sprite at `(x, y)`.
    ///
    /// The origin is computed in `f32` and floored to whole pixels, so
    /// positions beyond 2^24 lose integer precision. Out of range results
    /// saturate to the `i32` limits and a NaN coordinate lands on 0; the
    /// collider counts as placed either way.
    pub fn set_pos(&mut self, x: f32, y: f32) {
        let size = Vec2::new(self.mask.width() as f32, self.mask.height() as f32);
        let origin = (Vec2::new(x, y) - size * self.anchor).floor();
        self.origin = Some(point(origin.x as i32, origin.y as i32));
    }

    pub fn is_placed(&self) -> bool {
        self.origin.is_some()
    }

    /// Top left corner in world space, if placed.
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    pub fn dimension(&self) -> Dimension {
        self.mask.dimension()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.origin
            .map(|origin| rect(origin.x, origin.y, self.mask.width(), self.mask.height()))
    }

    pub fn mask(&self) -> &Rc<Mask> {
        &self.mask
    }

    /// Checks whether any visible pixel of `self` overlaps a visible pixel of
    /// `other`. Always false while either collider is unplaced.
    pub fn test(&self, other: &Collider) -> bool {
        match (self.origin, other.origin) {
            (Some(this_origin), Some(other_origin)) => {
                masks_overlap(&self.mask, this_origin, &other.mask, other_origin)
            }
            _ => false,
        }
    }

    /// Checks whether the world space pixel `(x, y)` is visible.
    pub fn hit(&self, x: i32, y: i32) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        if !point_is_inside_rect(x as i64, y as i64, bounds) {
            return false;
        }
        let local_x = (x as i64 - bounds.x as i64) as u32;
        let local_y = (y as i64 - bounds.y as i64) as u32;
        self.mask.is_visible(local_x, local_y)
    }
}

impl CollisionSystem {
    pub fn new() -> Self {
        CollisionSystem {
            pixel_test: Box::new(default_pixel_test),
            cache: MaskCache::new(),
        }
    }

    pub fn from_config(config: &CollisionConfig) -> Self {
        CollisionSystem {
            pixel_test: config.pixel_test(),
            cache: MaskCache::new(),
        }
    }

    /// Replaces the pixel test for masks built from now on. Masks already
    /// built, cached ones included, are left as they are.
    pub fn set_pixel_test<T>(&mut self, pixel_test: T)
    where
        T: Fn(u8, u8, u8, u8) -> bool + 'static,
    {
        self.pixel_test = Box::new(pixel_test);
    }

    pub fn reset_pixel_test(&mut self) {
        self.pixel_test = Box::new(default_pixel_test);
    }

    /// Creates a collider for `source`, reusing the cached mask when this
    /// source has been seen before.
    pub fn collider(&mut self, source: &dyn PixelSource) -> Collider {
        let id = source.id();
        if let Some(mask) = self.cache.get(id) {
            log::trace!("Mask cache hit for {:?}", id);
            return Collider::from_mask(mask);
        }

        log::trace!("Mask cache miss for {:?}", id);
        let mask = Rc::new(self.build_mask(source));
        self.cache.put(id, Rc::clone(&mask));
        Collider::from_mask(mask)
    }

    /// Creates a collider from a freshly built mask, bypassing the cache.
    pub fn collider_uncached(&self, source: &dyn PixelSource) -> Collider {
        Collider::from_mask(Rc::new(self.build_mask(source)))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_mask_count(&self) -> usize {
        self.cache.len()
    }

    fn build_mask(&self, source: &dyn PixelSource) -> Mask {
        let dimension = source.dimension();
        let mask = build_mask_from_rgba(dimension, &source.rgba(), &self.pixel_test);
        log::debug!(
            "Built {}x{} mask for {:?}, {} visible pixels",
            dimension.width,
            dimension.height,
            source.id(),
            mask.count_visible()
        );
        mask
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}
