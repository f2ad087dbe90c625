//! Document model

use crate::{DocxError, Result};
use image::ImageReader;
use std::io::Cursor;

/// A length stored in English Metric Units (914400 per inch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Length(i64);

impl Length {
    pub const EMU_PER_INCH: i64 = 914_400;
    pub const EMU_PER_TWIP: i64 = 635;

    pub fn emu(value: i64) -> Self {
        Self(value)
    }

    pub fn inches(value: f64) -> Self {
        Self((value * Self::EMU_PER_INCH as f64).round() as i64)
    }

    pub fn twips(value: i64) -> Self {
        Self(value * Self::EMU_PER_TWIP)
    }

    pub fn as_emu(self) -> i64 {
        self.0
    }

    pub fn as_twips(self) -> i64 {
        self.0 / Self::EMU_PER_TWIP
    }
}

/// Paragraph alignment (`w:jc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// A run of text sharing formatting
///
/// `\n` in the text becomes a line break inside the paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub rtl: bool,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rtl(mut self) -> Self {
        self.rtl = true;
        self
    }
}

/// An image registered with the document, sized for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picture {
    /// Index into the document's media list
    pub(crate) media: usize,
    pub width: Length,
    pub height: Length,
}

/// Paragraph content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Run(Run),
    Picture(Picture),
}

/// A paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    /// Right-to-left paragraph direction (`w:bidi`)
    pub bidi: bool,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn bidi(mut self) -> Self {
        self.bidi = true;
        self
    }

    /// Append a plain run
    pub fn text(self, text: impl Into<String>) -> Self {
        self.run(Run::new(text))
    }

    pub fn run(mut self, run: Run) -> Self {
        self.inlines.push(Inline::Run(run));
        self
    }

    pub fn picture(mut self, picture: Picture) -> Self {
        self.inlines.push(Inline::Picture(picture));
        self
    }
}

/// A table cell; always holds at least one paragraph when written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }
}

/// A rectangular table drawn with the grid style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub cols: usize,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            rows: vec![vec![TableCell::default(); cols]; rows],
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut TableCell> {
        self.rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(DocxError::InvalidCell { row, col })
    }
}

/// Body-level block
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Paragraph(Paragraph),
    PageBreak,
    Table(Table),
}

/// Embedded image file
#[derive(Debug, Clone)]
pub(crate) struct Media {
    pub data: Vec<u8>,
    pub extension: &'static str,
}

/// A Word document under construction (A4 portrait)
#[derive(Debug, Clone)]
pub struct DocxDocument {
    pub(crate) blocks: Vec<Block>,
    pub(crate) media: Vec<Media>,
    pub(crate) header: Option<Paragraph>,
    /// Page margin on all four sides
    pub margin: Length,
    pub title: Option<String>,
}

impl Default for DocxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxDocument {
    /// A4 page width in twips
    pub const PAGE_WIDTH_TWIPS: i64 = 11906;
    /// A4 page height in twips
    pub const PAGE_HEIGHT_TWIPS: i64 = 16838;

    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            media: Vec::new(),
            header: None,
            margin: Length::inches(0.7),
            title: None,
        }
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> Length {
        Length::twips(Self::PAGE_WIDTH_TWIPS - 2 * self.margin.as_twips())
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Register an image scaled to `width`, keeping its aspect ratio
    pub fn add_picture(&mut self, data: &[u8], width: Length) -> Result<Picture> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let extension = match reader.format() {
            Some(image::ImageFormat::Png) => "png",
            Some(image::ImageFormat::Jpeg) => "jpeg",
            _ => return Err(DocxError::ImageError("Unsupported image format".to_string())),
        };
        let (px_width, px_height) = reader.into_dimensions()?;
        if px_width == 0 {
            return Err(DocxError::ImageError("Image has zero width".to_string()));
        }

        let height = Length::emu(
            (width.as_emu() as f64 * px_height as f64 / px_width as f64).round() as i64,
        );

        self.media.push(Media {
            data: data.to_vec(),
            extension,
        });
        Ok(Picture {
            media: self.media.len() - 1,
            width,
            height,
        })
    }

    /// Put a centered image in the default page header
    pub fn set_header_picture(&mut self, data: &[u8], width: Length) -> Result<()> {
        let picture = self.add_picture(data, width)?;
        self.header = Some(Paragraph::new().align(Alignment::Center).picture(picture));
        Ok(())
    }

    /// Serialize to a .docx package
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::package::write_package(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageLuma8(image::ImageBuffer::new(width, height));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_length_conversions() {
        assert_eq!(Length::inches(1.0).as_emu(), 914_400);
        assert_eq!(Length::inches(0.7).as_twips(), 1008);
        assert_eq!(Length::twips(1440), Length::inches(1.0));
    }

    #[test]
    fn test_content_width() {
        let doc = DocxDocument::new();
        assert_eq!(doc.content_width().as_twips(), 11906 - 2016);
    }

    #[test]
    fn test_add_picture_keeps_aspect() {
        let mut doc = DocxDocument::new();
        let picture = doc.add_picture(&png(200, 100), Length::inches(1.4)).unwrap();
        assert_eq!(picture.width, Length::inches(1.4));
        assert_eq!(picture.height, Length::inches(0.7));
        assert_eq!(doc.media.len(), 1);
        assert_eq!(doc.media[0].extension, "png");
    }

    #[test]
    fn test_add_picture_rejects_garbage() {
        let mut doc = DocxDocument::new();
        assert!(doc.add_picture(b"nope", Length::inches(1.0)).is_err());
    }

    #[test]
    fn test_table_cell_bounds() {
        let mut table = Table::new(1, 2);
        assert!(table.cell_mut(0, 1).is_ok());
        assert!(matches!(
            table.cell_mut(1, 0),
            Err(DocxError::InvalidCell { row: 1, col: 0 })
        ));
    }

    #[test]
    fn test_paragraph_builder() {
        let p = Paragraph::new()
            .align(Alignment::Right)
            .bidi()
            .run(Run::new("الطرف الأول").bold().rtl());
        assert_eq!(p.alignment, Some(Alignment::Right));
        assert!(p.bidi);
        assert_eq!(
            p.inlines,
            vec![Inline::Run(Run {
                text: "الطرف الأول".to_string(),
                bold: true,
                rtl: true
            })]
        );
    }
}
