//! Presentation attributes
//!
//! These ride along with a [`Cell`](crate::Cell) for the grid renderer.
//! Formula evaluation never looks at them.

mod alignment;

pub use alignment::HorizontalAlignment;

/// Font emphasis and alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Presentation {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Horizontal alignment
    #[cfg_attr(feature = "serde", serde(rename = "align"))]
    pub alignment: HorizontalAlignment,
}

impl Presentation {
    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set horizontal alignment
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}
