//! WordprocessingML rendering

use crate::document::{Block, DocxDocument, Inline, Paragraph, Picture, Run, Table};
use std::fmt::Write;

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

pub(crate) const XML_DECL: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Relationship id of the default header part
pub(crate) const HEADER_REL_ID: &str = "rIdHeader1";

/// Escape text for element content and attribute values
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn media_name(index: usize, extension: &str) -> String {
    format!("image{}.{extension}", index + 1)
}

pub(crate) fn media_rel_id(index: usize) -> String {
    format!("rIdImage{}", index + 1)
}

fn namespaces() -> String {
    format!(
        "xmlns:w=\"{NS_W}\" xmlns:r=\"{NS_R}\" xmlns:wp=\"{NS_WP}\" xmlns:a=\"{NS_A}\" xmlns:pic=\"{NS_PIC}\""
    )
}

/// Serializer state shared across parts; drawing ids must be unique per package
pub(crate) struct Renderer<'a> {
    doc: &'a DocxDocument,
    next_drawing_id: u32,
}

impl<'a> Renderer<'a> {
    pub fn new(doc: &'a DocxDocument) -> Self {
        Self {
            doc,
            next_drawing_id: 1,
        }
    }

    pub fn document_xml(&mut self) -> String {
        let mut out = String::from(XML_DECL);
        let _ = write!(out, "<w:document {}><w:body>", namespaces());

        for block in &self.doc.blocks {
            match block {
                Block::Paragraph(p) => self.paragraph(&mut out, p),
                Block::PageBreak => out.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>"),
                Block::Table(t) => self.table(&mut out, t),
            }
        }

        let margin = self.doc.margin.as_twips();
        out.push_str("<w:sectPr>");
        if self.doc.header.is_some() {
            let _ = write!(
                out,
                "<w:headerReference w:type=\"default\" r:id=\"{HEADER_REL_ID}\"/>"
            );
        }
        let _ = write!(
            out,
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
             <w:pgMar w:top=\"{margin}\" w:right=\"{margin}\" w:bottom=\"{margin}\" w:left=\"{margin}\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>",
            DocxDocument::PAGE_WIDTH_TWIPS,
            DocxDocument::PAGE_HEIGHT_TWIPS,
        );
        out.push_str("</w:sectPr></w:body></w:document>");
        out
    }

    pub fn header_xml(&mut self) -> Option<String> {
        let header = self.doc.header.as_ref()?;
        let mut out = String::from(XML_DECL);
        let _ = write!(out, "<w:hdr {}>", namespaces());
        self.paragraph(&mut out, header);
        out.push_str("</w:hdr>");
        Some(out)
    }

    fn paragraph(&mut self, out: &mut String, p: &Paragraph) {
        out.push_str("<w:p>");
        if p.bidi || p.alignment.is_some() {
            out.push_str("<w:pPr>");
            if p.bidi {
                out.push_str("<w:bidi/>");
            }
            if let Some(alignment) = p.alignment {
                let _ = write!(out, "<w:jc w:val=\"{}\"/>", alignment.as_str());
            }
            out.push_str("</w:pPr>");
        }
        for inline in &p.inlines {
            match inline {
                Inline::Run(run) => run_xml(out, run),
                Inline::Picture(picture) => self.picture(out, picture),
            }
        }
        out.push_str("</w:p>");
    }

    fn table(&mut self, out: &mut String, table: &Table) {
        let cols = table.cols.max(1) as i64;
        let col_width = self.doc.content_width().as_twips() / cols;

        out.push_str(
            "<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr><w:tblGrid>",
        );
        for _ in 0..cols {
            let _ = write!(out, "<w:gridCol w:w=\"{col_width}\"/>");
        }
        out.push_str("</w:tblGrid>");

        for row in &table.rows {
            out.push_str("<w:tr>");
            for cell in row {
                let _ = write!(
                    out,
                    "<w:tc><w:tcPr><w:tcW w:w=\"{col_width}\" w:type=\"dxa\"/></w:tcPr>"
                );
                if cell.paragraphs.is_empty() {
                    out.push_str("<w:p/>");
                }
                for p in &cell.paragraphs {
                    self.paragraph(out, p);
                }
                out.push_str("</w:tc>");
            }
            out.push_str("</w:tr>");
        }
        out.push_str("</w:tbl>");
    }

    fn picture(&mut self, out: &mut String, picture: &Picture) {
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;

        let (cx, cy) = (picture.width.as_emu(), picture.height.as_emu());
        let rel_id = media_rel_id(picture.media);
        let name = self
            .doc
            .media
            .get(picture.media)
            .map(|m| media_name(picture.media, m.extension))
            .unwrap_or_default();

        let _ = write!(
            out,
            "<w:r><w:drawing>\
             <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
             <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
             <wp:docPr id=\"{id}\" name=\"Picture {id}\"/>\
             <wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>\
             <a:graphic><a:graphicData uri=\"{NS_PIC}\"><pic:pic>\
             <pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
             <pic:blipFill><a:blip r:embed=\"{rel_id}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
             <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
             <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
             </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"
        );
    }
}

fn run_xml(out: &mut String, run: &Run) {
    out.push_str("<w:r>");
    if run.bold || run.rtl {
        out.push_str("<w:rPr>");
        if run.bold {
            out.push_str("<w:b/><w:bCs/>");
        }
        if run.rtl {
            out.push_str("<w:rtl/>");
        }
        out.push_str("</w:rPr>");
    }
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        if !line.is_empty() {
            let _ = write!(out, "<w:t xml:space=\"preserve\">{}</w:t>", escape(line));
        }
    }
    out.push_str("</w:r>");
}

pub(crate) fn styles_xml() -> String {
    format!(
        "{XML_DECL}<w:styles xmlns:w=\"{NS_W}\">\
         <w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"Arial\" w:hAnsi=\"Arial\" w:eastAsia=\"Arial\" w:cs=\"Arial\"/>\
         <w:sz w:val=\"26\"/><w:szCs w:val=\"26\"/>\
         </w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/>\
         <w:rPr><w:rFonts w:ascii=\"Arial\" w:hAnsi=\"Arial\" w:eastAsia=\"Arial\" w:cs=\"Arial\"/>\
         <w:sz w:val=\"26\"/><w:szCs w:val=\"26\"/></w:rPr></w:style>\
         <w:style w:type=\"table\" w:default=\"1\" w:styleId=\"TableNormal\"><w:name w:val=\"Normal Table\"/>\
         <w:tblPr><w:tblInd w:w=\"0\" w:type=\"dxa\"/><w:tblCellMar>\
         <w:top w:w=\"0\" w:type=\"dxa\"/><w:left w:w=\"108\" w:type=\"dxa\"/>\
         <w:bottom w:w=\"0\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/>\
         </w:tblCellMar></w:tblPr></w:style>\
         <w:style w:type=\"table\" w:styleId=\"TableGrid\"><w:name w:val=\"Table Grid\"/>\
         <w:basedOn w:val=\"TableNormal\"/><w:tblPr><w:tblBorders>\
         <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
         </w:tblBorders></w:tblPr></w:style>\
         </w:styles>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Alignment, Length};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("x\u{1}y"), "xy");
        assert_eq!(escape("نص"), "نص");
    }

    #[test]
    fn test_run_line_breaks() {
        let mut out = String::new();
        run_xml(&mut out, &Run::new("أ\nب"));
        assert_eq!(
            out,
            "<w:r><w:t xml:space=\"preserve\">أ</w:t><w:br/><w:t xml:space=\"preserve\">ب</w:t></w:r>"
        );
    }

    #[test]
    fn test_run_properties() {
        let mut out = String::new();
        run_xml(&mut out, &Run::new("x").bold().rtl());
        assert!(out.starts_with("<w:r><w:rPr><w:b/><w:bCs/><w:rtl/></w:rPr>"));
    }

    #[test]
    fn test_paragraph_properties() {
        let mut doc = DocxDocument::new();
        doc.add_paragraph(Paragraph::new().align(Alignment::Right).bidi().text("x"));
        let xml = Renderer::new(&doc).document_xml();
        assert!(xml.contains("<w:pPr><w:bidi/><w:jc w:val=\"right\"/></w:pPr>"));
        assert!(xml.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>"));
        assert!(xml.contains("w:top=\"1008\""));
        assert!(!xml.contains("headerReference"));
    }

    #[test]
    fn test_table_cells() {
        let mut doc = DocxDocument::new();
        doc.add_table(Table::new(1, 2));
        let xml = Renderer::new(&doc).document_xml();
        assert_eq!(xml.matches("<w:tc>").count(), 2);
        assert_eq!(xml.matches("<w:gridCol w:w=\"4945\"/>").count(), 2);
        assert!(xml.contains("TableGrid"));
    }

    #[test]
    fn test_drawing_ids_unique() {
        let mut doc = DocxDocument::new();
        let picture = Picture {
            media: 0,
            width: Length::inches(1.0),
            height: Length::inches(1.0),
        };
        doc.add_paragraph(Paragraph::new().picture(picture).picture(picture));
        let xml = Renderer::new(&doc).document_xml();
        assert!(xml.contains("<wp:docPr id=\"1\""));
        assert!(xml.contains("<wp:docPr id=\"2\""));
        assert!(xml.contains("cx=\"914400\""));
        assert!(xml.contains("r:embed=\"rIdImage1\""));
    }
}
