//! Text rendering for node labels, description rows and legend entries.
//!
//! - [`TextDefinition`]: reusable text style
//! - [`Text`]: content paired with a [`TextDefinition`]
//!
//! ```
//! # use topoview_core::draw::{TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_size(14);
//!
//! let text = Text::new(&style, "edge-router");
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};
use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
};

/// Horizontal alignment of a text element relative to its position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Position is the left edge of the text
    Start,
    /// Position is the horizontal center of the text
    #[default]
    Middle,
}

impl TextAnchor {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// Visual style for text elements.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial"` |
/// | Font size | `12` |
/// | Font weight | unset |
/// | Anchor | [`TextAnchor::Middle`] |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    font_weight: Option<u16>,
    anchor: TextAnchor,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family, e.g. "Arial" or "monospace".
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the numeric font weight (100-900), or clears it with `None`.
    pub fn set_font_weight(&mut self, weight: Option<u16>) {
        self.font_weight = weight;
    }

    /// Sets the horizontal anchor.
    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Returns the font family.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the font weight, if set.
    pub fn font_weight(&self) -> Option<u16> {
        self.font_weight
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12,
            font_weight: None,
            anchor: TextAnchor::default(),
        }
    }
}

/// A renderable single- or multi-line text element.
///
/// The position passed to [`Drawable::render_to_layers`] is the anchor point
/// of the first line's baseline center.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    /// Creates a new text element with the given definition and content.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    /// Returns the text content of this element.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Calculates the size required to display this text.
    pub fn calculate_size(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let line_height = self.definition.font_size() as f32 * LINE_HEIGHT_FACTOR;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", self.definition.anchor.to_svg_value())
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(weight) = self.definition.font_weight() {
            rendered_text = rendered_text.set("font-weight", weight);
        }

        for (index, line) in self.content.lines().enumerate() {
            let dy = if index == 0 { 0.0 } else { line_height };
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", dy)
                .add(SvgText::new(line));
            rendered_text = rendered_text.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Points to pixels at standard DPI.
const PT_TO_PX: f32 = 1.33;

/// Average glyph advance relative to the font size, used when shaping yields
/// no glyphs (no fonts installed).
const FALLBACK_ADVANCE: f32 = 0.55;

/// Measures text with a shared cosmic-text [`FontSystem`].
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let font_size_px = text_def.font_size() as f32 * PT_TO_PX;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);
        let line_count = text.lines().count().max(1) as f32;
        let fallback = || {
            let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            Size::new(
                longest as f32 * font_size_px * FALLBACK_ADVANCE,
                line_count * metrics.line_height,
            )
        };

        let Ok(mut font_system) = self.font_system.lock() else {
            warn!("FontSystem lock poisoned, estimating text size");
            return fallback();
        };

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if max_width <= 0.0 {
            return fallback();
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
