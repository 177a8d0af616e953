//! Screen-space geometry for the evasive button
//!
//! Offsets are relative to the button's rest centre (the centre of its
//! container). Everything here is recomputed from a fresh `Layout` on each
//! call; nothing caches viewport sizes.

use glam::Vec2;
use rand::Rng;

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    pub fn min(&self) -> Vec2 {
        self.origin
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// True if `other` lies fully inside this rect (with a small tolerance)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.min().x >= self.min().x - EPS
            && other.min().y >= self.min().y - EPS
            && other.max().x <= self.max().x + EPS
            && other.max().y <= self.max().y + EPS
    }
}

/// A measured snapshot of the page: viewport size and the evasive button's
/// container (whose centre is the button's rest position)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport: Vec2,
    pub container: Rect,
}

impl Layout {
    pub fn new(viewport: Vec2, container: Rect) -> Self {
        Self { viewport, container }
    }

    /// False for zero-sized or non-finite measurements (element not laid out yet)
    pub fn is_measurable(&self) -> bool {
        self.viewport.is_finite()
            && self.container.origin.is_finite()
            && self.container.size.is_finite()
            && self.viewport.cmpgt(Vec2::ZERO).all()
            && self.container.size.cmpgt(Vec2::ZERO).all()
    }

    pub fn rest_center(&self) -> Vec2 {
        self.container.center()
    }

    /// Half width/height of the button at `scale` (the button fills its container at 1.0)
    pub fn half_extents(&self, scale: f32) -> Vec2 {
        self.container.size * scale * 0.5
    }

    /// Bounding box of the button displaced by `offset`
    pub fn element_rect(&self, offset: Vec2, scale: f32) -> Rect {
        Rect::from_center(self.rest_center() + offset, self.container.size * scale)
    }

    /// Viewport minus padding
    pub fn safe_area(&self, padding: f32) -> Rect {
        Rect {
            origin: Vec2::splat(padding),
            size: self.viewport - Vec2::splat(padding * 2.0),
        }
    }

    /// Legal offsets for the button at `scale`
    pub fn offset_bounds(&self, scale: f32, padding: f32) -> OffsetBounds {
        OffsetBounds::compute(
            self.rest_center(),
            self.half_extents(scale),
            self.viewport,
            padding,
        )
    }
}

/// Box of offsets that keep the element inside `[padding, viewport - padding]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl OffsetBounds {
    /// Compute the legal offset box.
    ///
    /// If the viewport is too narrow (or short) to fit the element plus
    /// padding on an axis, that axis collapses to the offset that centres the
    /// element on the viewport.
    pub fn compute(rest_center: Vec2, half_extents: Vec2, viewport: Vec2, padding: f32) -> Self {
        let pad = Vec2::splat(padding);
        let lo = pad + half_extents - rest_center;
        let hi = viewport - pad - half_extents - rest_center;
        let centered = viewport * 0.5 - rest_center;

        let (min_x, max_x) = if lo.x <= hi.x {
            (lo.x, hi.x)
        } else {
            (centered.x, centered.x)
        };
        let (min_y, max_y) = if lo.y <= hi.y {
            (lo.y, hi.y)
        } else {
            (centered.y, centered.y)
        };

        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    pub fn clamp(&self, offset: Vec2) -> Vec2 {
        Vec2::new(
            offset.x.clamp(self.min.x, self.max.x),
            offset.y.clamp(self.min.y, self.max.y),
        )
    }

    pub fn contains(&self, offset: Vec2) -> bool {
        const EPS: f32 = 1e-3;
        offset.x >= self.min.x - EPS
            && offset.x <= self.max.x + EPS
            && offset.y >= self.min.y - EPS
            && offset.y <= self.max.y + EPS
    }

    /// Uniformly random offset inside the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let t = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        self.min + (self.max - self.min) * t
    }
}

/// Clamp a proposed offset so the element stays fully on screen
pub fn clamp_offset(proposed: Vec2, layout: &Layout, scale: f32, padding: f32) -> Vec2 {
    layout.offset_bounds(scale, padding).clamp(proposed)
}

/// Proximity radius for an element drawn at `scale`
#[inline]
pub fn proximity_radius(escape_radius: f32, scale: f32) -> f32 {
    escape_radius * scale
}

/// True when `pointer` is strictly closer than `radius` to the element's centre.
///
/// An unmeasured element (`None`) never reports an intrusion.
pub fn detect_intrusion(element: Option<Rect>, pointer: Vec2, radius: f32) -> bool {
    match element {
        Some(rect) => rect.center().distance(pointer) < radius,
        None => false,
    }
}
