//! Platform abstraction layer
//!
//! The simulation asks for layout on demand through `LayoutProbe` every time
//! it needs geometry, so window resizes and orientation changes are always
//! picked up. Browsers measure the DOM; native builds and tests use a fixed
//! layout.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomLayout;

pub use crate::sim::geometry::Layout;

/// Source of live layout measurements
pub trait LayoutProbe {
    /// Current viewport and container geometry, or `None` if not laid out yet
    fn measure(&self) -> Option<Layout>;
}

impl<F> LayoutProbe for F
where
    F: Fn() -> Option<Layout>,
{
    fn measure(&self) -> Option<Layout> {
        self()
    }
}

/// A layout that only changes when told to (native demo, tests)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedLayout {
    pub layout: Option<Layout>,
}

impl FixedLayout {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout: Some(layout),
        }
    }

    /// Nothing mounted yet
    pub fn unmounted() -> Self {
        Self { layout: None }
    }
}

impl LayoutProbe for FixedLayout {
    fn measure(&self) -> Option<Layout> {
        self.layout.filter(Layout::is_measurable)
    }
}
