//! View state of the coloring studio.

use serde::Serialize;
use tracing::debug;

use crate::assets::BaseImage;
use crate::catalog::{self, Theme};
use crate::error::StudioError;
use crate::generate::GenerationOutcome;
use crate::surface::{Brush, Tool};

/// Where the selection view is.
///
/// `Idle → Generating → (Ready | FallbackReady)`; any new selection goes
/// back to `Generating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Generating,
    Ready,
    FallbackReady,
}

/// Selection-counter value a generation flow was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionTicket(u64);

/// Serializable view of [`StudioState`].
#[derive(Debug, Clone, Serialize)]
pub struct StudioSnapshot {
    pub phase: Phase,
    pub generating: bool,
    pub theme: Option<Theme>,
    pub base_image_kind: Option<&'static str>,
    /// Set for URL base images; inline payloads are only served as PNG
    pub base_image_url: Option<String>,
    pub color: String,
    pub tool: Tool,
    pub line_width: u32,
    pub selection: u64,
}

/// Everything the selection view owns.
///
/// Each selection bumps `selection`; a generation result is committed only
/// when it carries the current value, so a slow response for an old theme
/// can never overwrite a newer choice.
#[derive(Debug, Clone)]
pub struct StudioState {
    selected_theme: Option<Theme>,
    base_image: Option<BaseImage>,
    phase: Phase,
    brush: Brush,
    selection: u64,
}

impl Default for StudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioState {
    pub fn new() -> Self {
        Self {
            selected_theme: None,
            base_image: None,
            phase: Phase::Idle,
            brush: Brush::default(),
            selection: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    pub fn selected_theme(&self) -> Option<&Theme> {
        self.selected_theme.as_ref()
    }

    pub fn base_image(&self) -> Option<&BaseImage> {
        self.base_image.as_ref()
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Start generating for `theme`. The displayed image is cleared.
    pub fn select_theme(&mut self, theme: Theme) -> SelectionTicket {
        self.selection += 1;
        debug!(theme = %theme.id, selection = self.selection, "theme selected");
        self.selected_theme = Some(theme);
        self.base_image = None;
        self.phase = Phase::Generating;
        SelectionTicket(self.selection)
    }

    /// Commit a generation outcome.
    ///
    /// Returns false and leaves the state untouched when the ticket has been
    /// superseded by a later selection.
    pub fn settle(&mut self, ticket: SelectionTicket, outcome: GenerationOutcome) -> bool {
        if ticket.0 != self.selection {
            debug!(
                ticket = ticket.0,
                selection = self.selection,
                "dropping stale generation result"
            );
            return false;
        }
        self.phase = if outcome.is_fallback() {
            Phase::FallbackReady
        } else {
            Phase::Ready
        };
        self.base_image = Some(outcome.into_image());
        true
    }

    /// Open a carousel page directly, without generation.
    pub fn select_carousel_image(&mut self, url: &str) {
        self.selection += 1;
        self.selected_theme = Some(catalog::carousel_selection(url));
        self.base_image = Some(BaseImage::url(url));
        self.phase = Phase::Ready;
    }

    /// Close the studio and return to the gallery.
    pub fn back_to_gallery(&mut self) {
        self.selection += 1;
        self.selected_theme = None;
        self.base_image = None;
        self.phase = Phase::Idle;
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), StudioError> {
        self.brush.color = catalog::parse_color(color)?;
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    pub fn set_line_width(&mut self, width: u32) -> Result<(), StudioError> {
        if width == 0 || width > catalog::MAX_LINE_WIDTH {
            return Err(StudioError::InvalidInput(format!(
                "Line width must be between 1 and {}",
                catalog::MAX_LINE_WIDTH
            )));
        }
        self.brush.width = width;
        Ok(())
    }

    pub fn snapshot(&self) -> StudioSnapshot {
        StudioSnapshot {
            phase: self.phase,
            generating: self.is_generating(),
            theme: self.selected_theme.clone(),
            base_image_kind: self.base_image.as_ref().map(BaseImage::kind),
            base_image_url: self
                .base_image
                .as_ref()
                .and_then(|image| image.as_url().map(str::to_string)),
            color: catalog::to_hex(self.brush.color),
            tool: self.brush.tool,
            line_width: self.brush.width,
            selection: self.selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn theme(id: &str) -> Theme {
        catalog::theme_by_id(id).unwrap().clone()
    }

    fn generated(byte: u8) -> GenerationOutcome {
        GenerationOutcome::Generated(BaseImage::inline("image/png", vec![byte]))
    }

    #[test]
    fn test_starts_idle() {
        let state = StudioState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_generating());
        assert!(state.base_image().is_none());
    }

    #[test]
    fn test_select_then_ready() {
        let mut state = StudioState::new();
        let ticket = state.select_theme(theme("cyber-forest"));
        assert!(state.is_generating());
        assert!(state.settle(ticket, generated(7)));
        assert_eq!(state.phase(), Phase::Ready);
        assert!(!state.is_generating());
        assert_eq!(state.base_image(), Some(&BaseImage::inline("image/png", vec![7])));
    }

    #[test]
    fn test_fallback_ready() {
        let mut state = StudioState::new();
        let whale = theme("steampunk-whale");
        let ticket = state.select_theme(whale.clone());
        state.settle(ticket, GenerationOutcome::fallback(&whale, "boom"));
        assert_eq!(state.phase(), Phase::FallbackReady);
        assert!(!state.is_generating());
        assert_eq!(state.base_image().and_then(BaseImage::as_url), Some(whale.preview_url.as_str()));
    }

    #[test]
    fn test_reselect_clears_image() {
        let mut state = StudioState::new();
        let ticket = state.select_theme(theme("cyber-forest"));
        state.settle(ticket, generated(1));
        state.select_theme(theme("cosmic-flowers"));
        assert!(state.base_image().is_none());
        assert_eq!(state.phase(), Phase::Generating);
    }

    #[test]
    fn test_stale_result_dropped() {
        let mut state = StudioState::new();
        let old = state.select_theme(theme("cyber-forest"));
        let new = state.select_theme(theme("cosmic-flowers"));

        assert!(state.settle(new, generated(2)));
        assert!(!state.settle(old, generated(1)));

        assert_eq!(state.selected_theme().unwrap().id, "cosmic-flowers");
        assert_eq!(state.base_image(), Some(&BaseImage::inline("image/png", vec![2])));
    }

    #[test]
    fn test_stale_result_does_not_end_newer_generation() {
        let mut state = StudioState::new();
        let old = state.select_theme(theme("cyber-forest"));
        state.select_theme(theme("cosmic-flowers"));
        state.settle(old, generated(1));
        assert!(state.is_generating());
        assert!(state.base_image().is_none());
    }

    #[test]
    fn test_carousel_supersedes_pending_generation() {
        let mut state = StudioState::new();
        let ticket = state.select_theme(theme("cyber-forest"));
        state.select_carousel_image("https://i.ibb.co/ycsQ1tKn/1.jpg");
        assert_eq!(state.phase(), Phase::Ready);
        assert!(!state.settle(ticket, generated(1)));
        assert_eq!(
            state.base_image().and_then(BaseImage::as_url),
            Some("https://i.ibb.co/ycsQ1tKn/1.jpg")
        );
    }

    #[test]
    fn test_back_to_gallery() {
        let mut state = StudioState::new();
        let ticket = state.select_theme(theme("cyber-forest"));
        state.back_to_gallery();
        assert!(!state.settle(ticket, generated(1)));
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.selected_theme().is_none());
    }

    #[test]
    fn test_brush_settings() {
        let mut state = StudioState::new();
        assert_eq!(state.snapshot().color, "#ef4444");
        assert_eq!(state.snapshot().line_width, 6);

        state.set_color("#3b82f6").unwrap();
        state.set_tool(Tool::Eraser);
        state.set_line_width(12).unwrap();
        assert!(state.set_line_width(0).is_err());
        assert!(state.set_line_width(catalog::MAX_LINE_WIDTH + 1).is_err());
        assert!(state.set_line_width(4_000_000_000).is_err());
        assert!(state.set_color("blue-ish").is_err());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.color, "#3b82f6");
        assert_eq!(snapshot.tool, Tool::Eraser);
        assert_eq!(snapshot.line_width, 12);
    }
}
