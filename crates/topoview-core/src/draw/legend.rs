//! Control-bar legend: one icon plus title per control, laid out left to right.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextAnchor, TextDefinition},
    geometry::{Point, Size},
};

const ENTRY_WIDTH: f32 = 220.0;
const ICON_RADIUS: f32 = 7.0;
const LINE_LENGTH: f32 = 15.0;
const TITLE_GAP: f32 = 12.0;
const FONT_SIZE: u16 = 20;
const FONT_WEIGHT_DEFAULT: u16 = 300;
const FONT_WEIGHT_HIGHLIGHTED: u16 = 800;

/// Shape of a legend icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendIcon {
    /// Circle, used for node-related controls
    Node,
    /// Short line, used for edge-related controls
    Edge,
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    title: String,
    icon: LegendIcon,
    border_color: Color,
    highlighted: bool,
}

impl LegendEntry {
    pub fn new(title: impl Into<String>, icon: LegendIcon, border_color: Color) -> Self {
        Self {
            title: title.into(),
            icon,
            border_color,
            highlighted: false,
        }
    }

    pub fn with_highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// A row of legend entries.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: Vec<LegendEntry>,
    font_family: String,
}

impl Legend {
    pub fn new(font_family: &str) -> Self {
        Self {
            entries: Vec::new(),
            font_family: font_family.to_string(),
        }
    }

    pub fn push(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    fn render_entry(&self, entry: &LegendEntry, origin: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let stroke_width = if entry.highlighted { 2.0 } else { 1.0 };
        let stroke = StrokeDefinition::solid(entry.border_color, stroke_width);

        match entry.icon {
            LegendIcon::Node => {
                let circle = svg_element::Circle::new()
                    .set("cx", origin.x() + ICON_RADIUS)
                    .set("cy", origin.y())
                    .set("r", ICON_RADIUS)
                    .set("fill", "none");
                output.add_to_layer(RenderLayer::Legend, Box::new(apply_stroke!(circle, &stroke)));
            }
            LegendIcon::Edge => {
                let line = svg_element::Line::new()
                    .set("x1", origin.x())
                    .set("y1", origin.y())
                    .set("x2", origin.x() + LINE_LENGTH)
                    .set("y2", origin.y());
                output.add_to_layer(RenderLayer::Legend, Box::new(apply_stroke!(line, &stroke)));
            }
        }

        let mut title = TextDefinition::new();
        title.set_font_family(&self.font_family);
        title.set_font_size(FONT_SIZE);
        title.set_anchor(TextAnchor::Start);
        title.set_font_weight(Some(if entry.highlighted {
            FONT_WEIGHT_HIGHLIGHTED
        } else {
            FONT_WEIGHT_DEFAULT
        }));

        let title_position = origin.add_point(Point::new(LINE_LENGTH + TITLE_GAP, 0.0));
        for (_, node) in Text::new(&title, &entry.title)
            .render_to_layers(title_position)
            .into_items()
        {
            output.add_to_layer(RenderLayer::Legend, node);
        }

        output
    }
}

impl Drawable for Legend {
    /// Renders entries left to right; `position` is the first icon's center
    /// line.
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let origin = position.add_point(Point::new(index as f32 * ENTRY_WIDTH, 0.0));
            output.merge(self.render_entry(entry, origin));
        }
        output
    }

    fn size(&self) -> Size {
        if self.entries.is_empty() {
            return Size::default();
        }
        Size::new(
            self.entries.len() as f32 * ENTRY_WIDTH,
            (ICON_RADIUS * 2.0).max(f32::from(FONT_SIZE)),
        )
    }
}
