//! TrueType font handling for PDF documents
//!
//! Fonts are embedded whole as CIDFontType2 descendants of a Type0 font with
//! Identity-H encoding, so text is written as big-endian glyph IDs.

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::BTreeSet;
use ttf_parser::{Face, GlyphId};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// A parsed TrueType font and the characters drawn with it
#[derive(Debug, Clone)]
pub struct FontData {
    /// Variant name, also used as the PDF BaseFont
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters drawn so far (drives /W and ToUnicode)
    pub used_chars: BTreeSet<char>,
}

/// PDF objects generated for font embedding
///
/// References between the objects are filled in by the document when the
/// objects are added.
pub struct FontObjects {
    pub type0_font: Dictionary,
    pub cid_font: Dictionary,
    pub font_descriptor: Dictionary,
    pub font_file_stream: Stream,
    pub tounicode_stream: Stream,
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// The bytes are validated once here; the face is re-parsed on demand,
    /// which only reads the table directory.
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        Face::parse(ttf_data, 0).map_err(|e| PdfError::FontParseError(format!("{name}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: ttf_data.to_vec(),
            used_chars: BTreeSet::new(),
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.ttf_data, 0).ok()
    }

    /// Record characters as used
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()
            .and_then(|face| face.glyph_index(c))
            .map(|id| id.0)
    }

    pub fn units_per_em(&self) -> u16 {
        self.face().map(|face| face.units_per_em()).unwrap_or(1000)
    }

    pub fn ascender(&self) -> i16 {
        self.face().map(|face| face.ascender()).unwrap_or(800)
    }

    pub fn descender(&self) -> i16 {
        self.face().map(|face| face.descender()).unwrap_or(-200)
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        let Some(face) = self.face() else {
            return 0;
        };
        text.chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|gid| face.glyph_hor_advance(gid))
            .map(u32::from)
            .sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text) as f32;
        width / self.units_per_em() as f32 * font_size
    }

    /// Encode text as a hex string of glyph IDs for the Tj operator
    pub fn encode_text_hex(&self, text: &str) -> String {
        let face = self.face();
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for c in text.chars() {
            let gid = face
                .as_ref()
                .and_then(|f| f.glyph_index(c))
                .map(|id| id.0)
                .unwrap_or(0);
            hex.push_str(&format!("{gid:04X}"));
        }
        hex.push('>');
        hex
    }

    /// Generate all PDF objects needed to embed this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let base_font = Object::Name(self.name.clone().into_bytes());

        let tounicode = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(Dictionary::new(), tounicode.into_bytes());

        let compressed = crate::deflate(&self.ttf_data)?;
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Length1", Object::Integer(self.ttf_data.len() as i64)),
                ("Filter", Object::Name(b"FlateDecode".to_vec())),
            ]),
            compressed,
        );

        let ascender = self.ascender() as i64;
        let descender = self.descender() as i64;
        let scale = 1000.0 / self.units_per_em() as f64;
        let to_pdf_units = |v: i64| ((v as f64) * scale).round() as i64;

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"FontDescriptor".to_vec())),
            ("FontName", base_font.clone()),
            ("Flags", Object::Integer(4)),
            (
                "FontBBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(to_pdf_units(descender)),
                    Object::Integer(1000),
                    Object::Integer(to_pdf_units(ascender)),
                ]),
            ),
            ("ItalicAngle", Object::Integer(0)),
            ("Ascent", Object::Integer(to_pdf_units(ascender))),
            ("Descent", Object::Integer(to_pdf_units(descender))),
            ("CapHeight", Object::Integer(to_pdf_units(ascender))),
            ("StemV", Object::Integer(80)),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", Object::Integer(0)),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"CIDFontType2".to_vec())),
            ("BaseFont", base_font.clone()),
            ("CIDSystemInfo", Object::Dictionary(cid_system_info)),
            ("CIDToGIDMap", Object::Name(b"Identity".to_vec())),
            ("W", Object::Array(self.generate_widths_array())),
            ("DW", Object::Integer(1000)),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type0".to_vec())),
            ("BaseFont", base_font),
            ("Encoding", Object::Name(b"Identity-H".to_vec())),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate the /W array as `gid [width]` pairs, in 1000-unit em
    fn generate_widths_array(&self) -> Vec<Object> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let scale = 1000.0 / face.units_per_em() as f64;

        let gids: BTreeSet<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| face.glyph_index(c))
            .map(|id| id.0)
            .collect();

        let mut widths = Vec::with_capacity(gids.len() * 2);
        for gid in gids {
            let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
            widths.push(Object::Integer(gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                (advance as f64 * scale).round() as i64,
            )]));
        }
        widths
    }

    /// Generate ToUnicode CMap content mapping glyph IDs back to characters
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        let chars: Vec<char> = self.used_chars.iter().copied().collect();
        // bfchar sections are limited to 100 entries
        for chunk in chars.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &c in chunk {
                let gid = self.glyph_id(c).unwrap_or(0);
                let mut utf16 = [0u16; 2];
                let units: String = c
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{u:04X}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04X}> <{units}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\nend\n");
        cmap
    }
}

/// A font family: a regular face and an optional bold face
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub regular: FontData,
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// Build a family from TTF bytes; variants are named `{family}-regular`
    /// and `{family}-bold`
    pub fn from_ttf(family: &str, regular: &[u8], bold: Option<&[u8]>) -> Result<Self> {
        let regular = FontData::from_ttf(&format!("{family}-regular"), regular)?;
        let bold = bold
            .map(|data| FontData::from_ttf(&format!("{family}-bold"), data))
            .transpose()?;
        Ok(Self { regular, bold })
    }

    /// Get the variant for a weight, falling back to regular
    pub fn variant(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            FontWeight::Regular => &self.regular,
        }
    }

    pub fn variant_mut(&mut self, weight: FontWeight) -> &mut FontData {
        match (weight, self.bold.as_mut()) {
            (FontWeight::Bold, Some(bold)) => bold,
            _ => &mut self.regular,
        }
    }

    /// Iterate over all present variants
    pub fn variants(&self) -> impl Iterator<Item = &FontData> {
        std::iter::once(&self.regular).chain(self.bold.iter())
    }
}
