//! Open Packaging Conventions container

use crate::document::DocxDocument;
use crate::xml::{
    escape, media_name, media_rel_id, styles_xml, Renderer, HEADER_REL_ID, XML_DECL,
};
use crate::Result;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

pub(crate) fn write_package(doc: &DocxDocument) -> Result<Vec<u8>> {
    let mut renderer = Renderer::new(doc);
    let header = renderer.header_xml();
    let document = renderer.document_xml();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut part = |name: &str, data: &[u8]| -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };

    part("[Content_Types].xml", content_types(doc).as_bytes())?;
    part("_rels/.rels", package_rels().as_bytes())?;
    part("docProps/core.xml", core_properties(doc).as_bytes())?;
    part("word/document.xml", document.as_bytes())?;
    part("word/styles.xml", styles_xml().as_bytes())?;
    part(
        "word/_rels/document.xml.rels",
        document_rels(doc).as_bytes(),
    )?;
    if let Some(header) = header {
        part("word/header1.xml", header.as_bytes())?;
        part("word/_rels/header1.xml.rels", media_rels(doc, "").as_bytes())?;
    }
    for (index, media) in doc.media.iter().enumerate() {
        part(
            &format!("word/media/{}", media_name(index, media.extension)),
            &media.data,
        )?;
    }

    Ok(zip.finish()?.into_inner())
}

fn content_types(doc: &DocxDocument) -> String {
    let mut out = format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
         <Override PartName=\"/word/document.xml\" ContentType=\"{CT_MAIN}\"/>\
         <Override PartName=\"/word/styles.xml\" ContentType=\"{CT_STYLES}\"/>\
         <Override PartName=\"/docProps/core.xml\" ContentType=\"{CT_CORE}\"/>"
    );
    if doc.header.is_some() {
        out.push_str(&format!(
            "<Override PartName=\"/word/header1.xml\" ContentType=\"{CT_HEADER}\"/>"
        ));
    }
    out.push_str("</Types>");
    out
}

fn package_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_OFFICE_DOCUMENT}\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_CORE_PROPERTIES}\" Target=\"docProps/core.xml\"/>\
         </Relationships>"
    )
}

fn document_rels(doc: &DocxDocument) -> String {
    let mut extra = format!("<Relationship Id=\"rIdStyles\" Type=\"{REL_STYLES}\" Target=\"styles.xml\"/>");
    if doc.header.is_some() {
        extra.push_str(&format!(
            "<Relationship Id=\"{HEADER_REL_ID}\" Type=\"{REL_HEADER}\" Target=\"header1.xml\"/>"
        ));
    }
    media_rels(doc, &extra)
}

/// Relationships part listing every media file, plus `extra` entries
fn media_rels(doc: &DocxDocument, extra: &str) -> String {
    let mut out = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{extra}"
    );
    for (index, media) in doc.media.iter().enumerate() {
        out.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{REL_IMAGE}\" Target=\"media/{}\"/>",
            media_rel_id(index),
            media_name(index, media.extension)
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn core_properties(doc: &DocxDocument) -> String {
    let title = doc
        .title
        .as_deref()
        .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
        .unwrap_or_default();
    format!(
        "{XML_DECL}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\">{title}</cp:coreProperties>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_header_override() {
        let mut doc = DocxDocument::new();
        assert!(!content_types(&doc).contains("header1.xml"));
        doc.header = Some(crate::Paragraph::new());
        assert!(content_types(&doc).contains("/word/header1.xml"));
        assert!(document_rels(&doc).contains(HEADER_REL_ID));
    }

    #[test]
    fn test_core_properties_title_escaped() {
        let mut doc = DocxDocument::new();
        doc.title = Some("عقد <1>".to_string());
        assert!(core_properties(&doc).contains("<dc:title>عقد &lt;1&gt;</dc:title>"));
    }
}
