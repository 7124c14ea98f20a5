//! One visitor's studio: view state plus the drawing surface it feeds.

use image::DynamicImage;
use std::time::Instant;

use super::state::{SelectionTicket, StudioState};
use crate::catalog::Theme;
use crate::error::StudioError;
use crate::generate::GenerationOutcome;
use crate::surface::{DrawingSurface, InputEvent, LoadToken, PendingLoad, Tool};

/// A [`StudioState`] wired to its [`DrawingSurface`].
///
/// Every state change that touches the base image is mirrored onto the
/// surface. When the surface needs an image loaded, the [`PendingLoad`] is
/// handed back to the caller.
pub struct StudioSession {
    state: StudioState,
    surface: DrawingSurface,
    pub last_accessed: Instant,
}

impl StudioSession {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: StudioState::new(),
            surface: DrawingSurface::new(width, height),
            last_accessed: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    pub fn state(&self) -> &StudioState {
        &self.state
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Select a theme and clear the displayed image until generation settles.
    pub fn begin_theme(&mut self, theme: Theme) -> SelectionTicket {
        let ticket = self.state.select_theme(theme);
        self.sync_base_image();
        ticket
    }

    /// Commit a generation outcome; returns the base image to load, if the
    /// outcome was still current.
    pub fn settle(&mut self, ticket: SelectionTicket, outcome: GenerationOutcome) -> Option<PendingLoad> {
        if !self.state.settle(ticket, outcome) {
            return None;
        }
        self.sync_base_image()
    }

    pub fn select_carousel_image(&mut self, url: &str) -> Option<PendingLoad> {
        self.state.select_carousel_image(url);
        self.sync_base_image()
    }

    pub fn back_to_gallery(&mut self) {
        self.state.back_to_gallery();
        self.sync_base_image();
    }

    fn sync_base_image(&mut self) -> Option<PendingLoad> {
        self.surface.set_base_image(self.state.base_image().cloned())
    }

    /// Paint a loaded base image. Stale loads are ignored.
    pub fn complete_load(&mut self, token: LoadToken, image: DynamicImage) -> bool {
        self.surface.complete_load(token, image)
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), StudioError> {
        self.state.set_color(color)?;
        self.surface.set_brush(self.state.brush());
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.state.set_tool(tool);
        self.surface.set_brush(self.state.brush());
    }

    pub fn set_line_width(&mut self, width: u32) -> Result<(), StudioError> {
        self.state.set_line_width(width)?;
        self.surface.set_brush(self.state.brush());
        Ok(())
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.surface.handle_input(event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    /// Drop strokes; the active base image is redrawn.
    pub fn clear_drawing(&mut self) {
        self.surface.clear();
    }

    /// Rasterize the current page for printing.
    pub fn print_page(&self) -> Result<Vec<u8>, StudioError> {
        self.surface.to_png()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BaseImage;
    use crate::catalog;
    use crate::surface::{Point, PointerEvent};
    use image::{Rgba, RgbaImage};

    fn solid(color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, color))
    }

    #[test]
    fn test_begin_theme_blanks_surface() {
        let mut session = StudioSession::new(32, 32);
        let load = session
            .select_carousel_image("https://i.ibb.co/ycsQ1tKn/1.jpg")
            .unwrap();
        session.complete_load(load.token(), solid(Rgba([0, 0, 0, 255])));

        session.begin_theme(catalog::featured_theme().clone());
        assert!(session.surface().base_image().is_none());
        assert_eq!(session.surface().pixel(5, 5), catalog::BACKGROUND);
    }

    #[test]
    fn test_settle_returns_load_for_outcome() {
        let mut session = StudioSession::new(32, 32);
        let ticket = session.begin_theme(catalog::featured_theme().clone());
        let image = BaseImage::inline("image/png", vec![1, 2, 3]);
        let load = session
            .settle(ticket, GenerationOutcome::Generated(image.clone()))
            .unwrap();
        assert_eq!(load.image(), &image);
    }

    #[test]
    fn test_stale_settle_returns_nothing() {
        let mut session = StudioSession::new(32, 32);
        let old = session.begin_theme(catalog::featured_theme().clone());
        session.begin_theme(catalog::themes()[0].clone());
        let image = BaseImage::inline("image/png", vec![1]);
        assert!(session.settle(old, GenerationOutcome::Generated(image)).is_none());
        assert!(session.surface().base_image().is_none());
    }

    #[test]
    fn test_brush_changes_reach_surface() {
        let mut session = StudioSession::new(32, 32);
        session.set_color("#000000").unwrap();
        session.set_line_width(2).unwrap();
        session.handle_input(&InputEvent::PointerDown { x: 0.0, y: 16.0 });
        session.handle_input(&InputEvent::PointerMove { x: 32.0, y: 16.0 });
        assert_eq!(session.surface().pixel(10, 16), Rgba([0, 0, 0, 255]));
        assert_eq!(session.surface().pixel(10, 18), catalog::BACKGROUND);

        session.set_tool(Tool::Eraser);
        session.surface.handle(PointerEvent::Move(Point::new(0.0, 16.0)));
        assert_eq!(session.surface().pixel(10, 16), catalog::BACKGROUND);
    }
}
