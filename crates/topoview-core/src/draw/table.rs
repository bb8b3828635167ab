//! Description table drawn under a node label, one row per description line.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{
        Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextAnchor, TextDefinition,
    },
    geometry::{Bounds, Point, Size},
};

/// Style of description tables.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    width: f32,
    x_offset: f32,
    row_height: f32,
    text_indent: f32,
    border: StrokeDefinition,
    background: Color,
    text: TextDefinition,
}

impl TableDefinition {
    /// Creates a table style with the given row height.
    pub fn new(row_height: f32, font_family: &str) -> Self {
        let mut definition = Self {
            row_height,
            ..Self::default()
        };
        definition.text.set_font_family(font_family);
        definition
    }

    /// Returns the height of one row.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Bounds of a table with `rows` rows whose top edge is centered on
    /// `position`, or `None` for an empty table.
    pub fn bounds_at(&self, position: Point, rows: usize) -> Option<Bounds> {
        (rows > 0).then(|| {
            let left = position.x() + self.x_offset;
            Bounds::new(
                left,
                position.y(),
                left + self.width,
                position.y() + rows as f32 * self.row_height,
            )
        })
    }
}

impl Default for TableDefinition {
    fn default() -> Self {
        let mut text = TextDefinition::new();
        text.set_font_size(14);
        text.set_anchor(TextAnchor::Start);

        Self {
            width: 200.0,
            x_offset: -90.0,
            row_height: 30.0,
            text_indent: 20.0,
            border: StrokeDefinition::solid(
                Color::new("#cecece").expect("table border is a valid color"),
                1.0,
            ),
            background: Color::new("#fff").expect("table background is a valid color"),
            text,
        }
    }
}

/// The rows of one node's description list.
#[derive(Debug, Clone)]
pub struct DescriptionTable<'a> {
    definition: &'a TableDefinition,
    rows: &'a [String],
}

impl<'a> DescriptionTable<'a> {
    pub fn new(definition: &'a TableDefinition, rows: &'a [String]) -> Self {
        Self { definition, rows }
    }
}

impl Drawable for DescriptionTable<'_> {
    /// Renders the table with its top edge at `position.y`, horizontally
    /// offset from `position.x` (the node center).
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let left = position.x() + self.definition.x_offset;

        for (index, row) in self.rows.iter().enumerate() {
            let top = position.y() + index as f32 * self.definition.row_height;

            let cell = svg_element::Rectangle::new()
                .set("x", left)
                .set("y", top)
                .set("width", self.definition.width)
                .set("height", self.definition.row_height)
                .set("fill", self.definition.background.to_string());
            let cell = apply_stroke!(cell, &self.definition.border);
            output.add_to_layer(RenderLayer::Node, Box::new(cell));

            let text_position = Point::new(
                left + self.definition.text_indent,
                top + self.definition.row_height / 2.0,
            );
            output.merge(Text::new(&self.definition.text, row).render_to_layers(text_position));
        }

        output
    }

    fn size(&self) -> Size {
        if self.rows.is_empty() {
            return Size::default();
        }
        Size::new(
            self.definition.width,
            self.rows.len() as f32 * self.definition.row_height,
        )
    }
}
