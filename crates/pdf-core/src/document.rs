//! PDF document builder

use crate::font::{FontData, FontFamily, FontWeight};
use crate::image::{fit_width, generate_image_operators, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// Resources and content accumulated for one page
#[derive(Debug, Default)]
struct PageState {
    /// Font variant name -> resource name
    fonts: BTreeMap<String, String>,
    /// Image resource name -> XObject id
    images: BTreeMap<String, ObjectId>,
    /// Content stream operators
    content: Vec<u8>,
}

/// A PDF document assembled from scratch, page by page
///
/// Positions passed to the drawing methods are measured in points from the
/// top-left corner of the page; the conversion to PDF's bottom-left origin
/// happens here.
pub struct PdfDocument {
    inner: Document,
    pages_id: ObjectId,
    page_size: PageSize,
    pages: Vec<(ObjectId, PageState)>,
    font_families: HashMap<String, FontFamily>,
    current_family: Option<String>,
    current_weight: FontWeight,
    current_font_size: f32,
    next_font_resource: u32,
    /// Image data hash -> (XObject id, pixel width, pixel height)
    embedded_images: HashMap<u64, (ObjectId, u32, u32)>,
    next_image_resource: u32,
    title: Option<String>,
}

impl PdfDocument {
    /// Create an empty document; call `add_page` before drawing
    pub fn new(page_size: PageSize) -> Self {
        let mut inner = Document::with_version("1.7");
        let pages_id = inner.new_object_id();

        Self {
            inner,
            pages_id,
            page_size,
            pages: Vec::new(),
            font_families: HashMap::new(),
            current_family: None,
            current_weight: FontWeight::default(),
            current_font_size: 12.0,
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            next_image_resource: 1,
            title: None,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Set the document title written to the Info dictionary
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Append a blank page and return its number (1-indexed)
    pub fn add_page(&mut self) -> usize {
        let page_id = self.inner.new_object_id();
        self.pages.push((page_id, PageState::default()));
        self.pages.len()
    }

    /// Register a font family
    ///
    /// # Example
    /// ```ignore
    /// doc.register_font_family("body", FontFamily::from_ttf("body", &regular, Some(&bold))?)?;
    /// doc.set_font("body", 14.0)?;
    /// doc.set_font_weight(FontWeight::Bold)?;
    /// ```
    pub fn register_font_family(&mut self, name: &str, family: FontFamily) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.font_families.insert(name.to_string(), family);
        Ok(())
    }

    /// Set the current font family and size
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.font_families.contains_key(family) {
            return Err(PdfError::FontNotFound(family.to_string()));
        }
        self.current_family = Some(family.to_string());
        self.current_font_size = size;
        Ok(())
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) -> Result<()> {
        self.current_family()?;
        self.current_weight = weight;
        Ok(())
    }

    fn current_family(&self) -> Result<&FontFamily> {
        self.current_family
            .as_ref()
            .and_then(|name| self.font_families.get(name))
            .ok_or_else(|| PdfError::FontNotFound("No font family set".to_string()))
    }

    fn current_font(&self) -> Result<&FontData> {
        Ok(self.current_family()?.variant(self.current_weight))
    }

    fn current_font_mut(&mut self) -> Result<&mut FontData> {
        let weight = self.current_weight;
        let family = self
            .current_family
            .as_ref()
            .and_then(|name| self.font_families.get_mut(name))
            .ok_or_else(|| PdfError::FontNotFound("No font family set".to_string()))?;
        Ok(family.variant_mut(weight))
    }

    /// Width of `text` in points with the current font and size
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        Ok(self
            .current_font()?
            .text_width_points(text, self.current_font_size) as f64)
    }

    fn page_state(&mut self, page: usize) -> Result<&mut PageState> {
        let count = self.pages.len();
        if page == 0 || page > count {
            return Err(PdfError::InvalidPage(page, count));
        }
        Ok(&mut self.pages[page - 1].1)
    }

    /// Insert a single line of text
    ///
    /// The text is drawn glyph by glyph left to right, so right-to-left
    /// scripts must already be shaped into visual order.
    ///
    /// # Arguments
    /// * `text` - Text to draw
    /// * `page` - Page number (1-indexed)
    /// * `x` - Anchor X in points (left edge, center, or right edge per `align`)
    /// * `y` - Baseline Y in points from the top of the page
    /// * `align` - Horizontal alignment around `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.page_state(page)?;
        if text.is_empty() {
            return Ok(());
        }

        let font_size = self.current_font_size;
        let (variant, width, text_hex) = {
            let font = self.current_font_mut()?;
            font.add_chars(text);
            (
                font.name.clone(),
                font.text_width_points(text, font_size) as f64,
                font.encode_text_hex(text),
            )
        };

        let start_x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let pdf_y = self.page_size.height - y;

        let resource = self.font_resource(page, &variant)?;
        let ctx = TextRenderContext {
            font_name: resource,
            font_size,
        };
        let ops = generate_text_operators(&text_hex, start_x, pdf_y, &ctx);
        self.page_state(page)?.content.extend_from_slice(&ops);
        Ok(())
    }

    fn font_resource(&mut self, page: usize, variant: &str) -> Result<String> {
        let next = self.next_font_resource;
        let state = self.page_state(page)?;
        if let Some(name) = state.fonts.get(variant) {
            return Ok(name.clone());
        }
        let name = format!("F{next}");
        state.fonts.insert(variant.to_string(), name.clone());
        self.next_font_resource += 1;
        Ok(name)
    }

    /// Insert a JPEG or PNG image `width` points wide
    ///
    /// The height follows the image's aspect ratio. Returns the drawn
    /// (width, height) in points.
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
    ) -> Result<(f64, f64)> {
        self.page_state(page)?;

        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let key = hasher.finish();

        let (object_id, px_width, px_height) = match self.embedded_images.get(&key) {
            Some(entry) => *entry,
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                let id = self.inner.add_object(xobject.to_pdf_stream());
                let entry = (id, xobject.width, xobject.height);
                self.embedded_images.insert(key, entry);
                entry
            }
        };

        let next = self.next_image_resource;
        let state = self.page_state(page)?;
        let resource = match state.images.iter().find(|(_, id)| **id == object_id) {
            Some((name, _)) => name.clone(),
            None => {
                let name = format!("Im{next}");
                state.images.insert(name.clone(), object_id);
                self.next_image_resource += 1;
                name
            }
        };

        let (draw_w, draw_h) = fit_width((px_width, px_height), width);
        let pdf_y = self.page_size.height - y - draw_h;
        let ops = generate_image_operators(&resource, x, pdf_y, draw_w, draw_h);
        self.page_state(page)?.content.extend_from_slice(&ops);

        Ok((draw_w, draw_h))
    }

    /// Serialize the document
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    fn finalize(&mut self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(PdfError::SaveError("Document has no pages".to_string()));
        }

        let font_ids = self.embed_fonts()?;

        let pages = std::mem::take(&mut self.pages);
        let mut kids = Vec::with_capacity(pages.len());
        for (page_id, state) in pages {
            let mut font_dict = Dictionary::new();
            for (variant, resource) in &state.fonts {
                let id = font_ids
                    .get(variant)
                    .ok_or_else(|| PdfError::FontNotFound(variant.clone()))?;
                font_dict.set(resource.as_bytes(), Object::Reference(*id));
            }
            let mut xobject_dict = Dictionary::new();
            for (resource, id) in &state.images {
                xobject_dict.set(resource.as_bytes(), Object::Reference(*id));
            }

            let content = crate::deflate(&state.content)?;
            let contents_id = self.inner.add_object(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                content,
            ));

            let page = dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(self.page_size.width as f32),
                    Object::Real(self.page_size.height as f32),
                ],
                "Resources" => dictionary! {
                    "Font" => font_dict,
                    "XObject" => xobject_dict,
                },
                "Contents" => contents_id,
            };
            self.inner.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        self.inner.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.inner.trailer.set("Root", catalog_id);

        let mut info = dictionary! { "Producer" => Object::string_literal("hr-docs") };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = self.inner.add_object(info);
        self.inner.trailer.set("Info", info_id);

        Ok(())
    }

    /// Embed every font variant that drew at least one character
    fn embed_fonts(&mut self) -> Result<HashMap<String, ObjectId>> {
        let used: Vec<FontData> = self
            .font_families
            .values()
            .flat_map(|family| family.variants())
            .filter(|font| !font.used_chars.is_empty())
            .cloned()
            .collect();

        let mut ids = HashMap::new();
        for font in used {
            let objects = font.to_pdf_objects()?;

            let file_id = self.inner.add_object(objects.font_file_stream);
            let mut descriptor = objects.font_descriptor;
            descriptor.set("FontFile2", Object::Reference(file_id));
            let descriptor_id = self.inner.add_object(descriptor);

            let mut cid_font = objects.cid_font;
            cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
            let cid_font_id = self.inner.add_object(cid_font);

            let tounicode_id = self.inner.add_object(objects.tounicode_stream);
            let mut type0 = objects.type0_font;
            type0.set(
                "DescendantFonts",
                Object::Array(vec![Object::Reference(cid_font_id)]),
            );
            type0.set("ToUnicode", Object::Reference(tounicode_id));
            let type0_id = self.inner.add_object(type0);

            ids.insert(font.name.clone(), type0_id);
        }
        Ok(ids)
    }
}

/// Encode a PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_no_pages() {
        let doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.page_count(), 0);
        assert!(doc.into_bytes().is_err());
    }

    #[test]
    fn test_add_page_numbers() {
        let mut doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.add_page(), 1);
        assert_eq!(doc.add_page(), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_insert_text_without_font() {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.add_page();
        let result = doc.insert_text("x", 1, 10.0, 10.0, Align::Left);
        assert!(matches!(result, Err(PdfError::FontNotFound(_))));
    }

    #[test]
    fn test_insert_text_invalid_page() {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.add_page();
        let result = doc.insert_text("x", 3, 10.0, 10.0, Align::Left);
        assert!(matches!(result, Err(PdfError::InvalidPage(3, 1))));
    }

    #[test]
    fn test_text_string_encoding() {
        match text_string("Leave") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Leave"),
            other => panic!("unexpected {other:?}"),
        }
        match text_string("إجازة") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(bytes.len(), 2 + 5 * 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
