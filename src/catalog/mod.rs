//! # Catalog
//!
//! The fixed, in-memory storefront catalog: coloring themes, the carousel
//! gallery, the toolbar palette and the checkout offers.
//!
//! Everything here is defined once at startup and never mutated.
//!
//! ```
//! use tiabela::catalog;
//!
//! let puppy = catalog::theme_by_id("cute-puppy-hero").unwrap();
//! assert_eq!(puppy.id, catalog::featured_theme().id);
//! ```

pub mod palette;
pub mod store;

use serde::Serialize;
use std::sync::LazyLock;

pub use palette::{
    BACKGROUND, DEFAULT_COLOR, DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH, PALETTE, parse_color, to_hex,
};
pub use store::{CAROUSEL_IMAGES, Product, product_by_id, products};

/// One illustration concept: prompt text plus a fallback preview image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Prompt sent to the image generation service (style directive is appended later)
    pub prompt: String,
    /// Static image shown when generation fails
    pub preview_url: String,
}

impl Theme {
    fn new(id: &str, name: &str, description: &str, prompt: &str, preview_url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt: prompt.to_string(),
            preview_url: preview_url.to_string(),
        }
    }
}

/// Id of the theme opened by the hero banner ("Colorir agora").
pub const FEATURED_THEME_ID: &str = "cute-puppy-hero";

/// Id given to themes synthesized around a carousel image.
pub const CAROUSEL_THEME_ID: &str = "carousel-selection";

static THEMES: LazyLock<Vec<Theme>> = LazyLock::new(|| {
    vec![
        Theme::new(
            "cyber-forest",
            "Robô Explorador da Selva",
            "Um robô futurista descobrindo segredos em uma floresta tecnológica.",
            "Intricate black and white coloring page, high quality line art, friendly futuristic robot in a bioluminescent forest, mechanical details, thick clean borders, white background, no shading.",
            "https://i.ibb.co/23sG826k/4.jpg",
        ),
        Theme::new(
            "steampunk-whale",
            "Baleia Mecânica Steam",
            "Uma majestosa baleia feita de engrenagens navegando pelo oceano de vapor.",
            "Professional coloring book page, black and white, steampunk underwater scene, mechanical whale with visible gears and brass pipes, bold clean lines, no gray scale, white background.",
            "https://i.ibb.co/tP4rnfPG/2.jpg",
        ),
        Theme::new(
            "cosmic-flowers",
            "Flora das Estrelas",
            "Flores mágicas que crescem no vácuo do espaço entre planetas e cometas.",
            "Space garden coloring page, high resolution black and white line art, exotic celestial flowers, stars as flower centers, floating planets, thick outlines, white background.",
            "https://i.ibb.co/cKKCYBky/3.jpg",
        ),
        Theme::new(
            FEATURED_THEME_ID,
            "Cãozinho Aventureiro da Tia Bela",
            "Um pet super fofo pronto para viver aventuras inesquecíveis.",
            "Ultra-cute puppy wearing a small adventurer cape, sparkling eyes, sitting in a field of daisies, bold black outlines, professional coloring book style, high resolution, white background.",
            "https://i.ibb.co/cRC1Zyr/cccb4e8da3e9d124ede6eb7a74598fdf.jpg",
        ),
    ]
});

/// All catalog themes, in display order.
pub fn themes() -> &'static [Theme] {
    &THEMES
}

/// Look up a theme by id.
pub fn theme_by_id(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

/// The theme behind the hero banner.
pub fn featured_theme() -> &'static Theme {
    theme_by_id(FEATURED_THEME_ID).unwrap_or(&THEMES[0])
}

/// Resolve a carousel click into a theme.
///
/// If the image is some theme's preview, that theme is returned. Otherwise a
/// gallery theme is synthesized around the URL.
pub fn carousel_selection(url: &str) -> Theme {
    if let Some(theme) = THEMES.iter().find(|t| t.preview_url == url) {
        return theme.clone();
    }
    Theme::new(
        CAROUSEL_THEME_ID,
        "Personagem Inesquecível",
        "Uma arte mágica selecionada da nossa galeria.",
        "Coloring page style",
        url,
    )
}
