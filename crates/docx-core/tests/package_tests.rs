//! End-to-end checks on written .docx packages

use docx_core::{Alignment, DocxDocument, Length, Paragraph, Run, Table};
use std::io::{Cursor, Read};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::ImageBuffer::new(width, height));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn read_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    Some(out)
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(String::from).collect()
}

#[test]
fn test_minimal_package_parts() {
    let mut doc = DocxDocument::new();
    doc.add_paragraph(Paragraph::new().text("Hello"));
    let bytes = doc.to_bytes().unwrap();

    let names = part_names(&bytes);
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }
    assert!(!names.iter().any(|n| n == "word/header1.xml"));

    let styles = read_part(&bytes, "word/styles.xml").unwrap();
    assert!(styles.contains("w:ascii=\"Arial\""));
    assert!(styles.contains("<w:sz w:val=\"26\"/>"));
}

#[test]
fn test_rtl_document_with_header_table_and_pictures() {
    let logo = png(280, 140);
    let signature = png(100, 50);

    let mut doc = DocxDocument::new();
    doc.set_header_picture(&logo, Length::inches(1.4)).unwrap();
    doc.add_paragraph(
        Paragraph::new()
            .align(Alignment::Right)
            .bidi()
            .run(Run::new("البند الأول\nنص & تفاصيل").rtl()),
    );
    doc.add_page_break();

    let mut table = Table::new(1, 2);
    let sig = doc.add_picture(&signature, Length::inches(0.8)).unwrap();
    table.cell_mut(0, 0).unwrap().add_paragraph(
        Paragraph::new()
            .align(Alignment::Right)
            .run(Run::new("الطرف الأول").bold()),
    );
    table
        .cell_mut(0, 0)
        .unwrap()
        .add_paragraph(Paragraph::new().picture(sig));
    table.cell_mut(0, 1).unwrap().add_paragraph(
        Paragraph::new()
            .align(Alignment::Left)
            .run(Run::new("الطرف الثاني").bold()),
    );
    doc.add_table(table);

    let bytes = doc.to_bytes().unwrap();
    let document = read_part(&bytes, "word/document.xml").unwrap();

    assert!(document.contains("<w:bidi/>"));
    assert!(document.contains("البند الأول</w:t><w:br/>"));
    assert!(document.contains("نص &amp; تفاصيل"));
    assert!(document.contains("<w:br w:type=\"page\"/>"));
    assert_eq!(document.matches("<w:tbl>").count(), 1);
    assert_eq!(document.matches("<w:tc>").count(), 2);
    assert!(document.contains("r:embed=\"rIdImage2\""));
    assert!(document.contains("headerReference"));

    let header = read_part(&bytes, "word/header1.xml").unwrap();
    assert!(header.contains("r:embed=\"rIdImage1\""));
    assert!(header.contains("<w:jc w:val=\"center\"/>"));

    let names = part_names(&bytes);
    assert!(names.iter().any(|n| n == "word/media/image1.png"));
    assert!(names.iter().any(|n| n == "word/media/image2.png"));

    let rels = read_part(&bytes, "word/_rels/document.xml.rels").unwrap();
    assert!(rels.contains("Target=\"header1.xml\""));
    assert!(rels.contains("Target=\"media/image2.png\""));
}
