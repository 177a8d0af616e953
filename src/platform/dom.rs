//! DOM-backed layout probe

use glam::Vec2;

use super::{Layout, LayoutProbe};
use crate::sim::geometry::Rect;

/// Measures the window and the No button's container on every call
#[derive(Debug, Clone)]
pub struct DomLayout {
    container_id: String,
}

impl DomLayout {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }
}

impl LayoutProbe for DomLayout {
    fn measure(&self) -> Option<Layout> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        let container = window
            .document()?
            .get_element_by_id(&self.container_id)?
            .get_bounding_client_rect();

        let layout = Layout::new(
            Vec2::new(width as f32, height as f32),
            Rect::new(
                container.left() as f32,
                container.top() as f32,
                container.width() as f32,
                container.height() as f32,
            ),
        );
        layout.is_measurable().then_some(layout)
    }
}
