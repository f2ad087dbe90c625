//! Contract generation inspected through the written .docx package

use hr_docs::{
    contract_file_name, generate_contract, Catalog, ContractRequest, HrConfig, HrError,
    LaborOffice,
};
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

fn png(path: &Path) {
    image::DynamicImage::ImageRgb8(image::ImageBuffer::new(120, 60))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

fn catalog(assets: &Path) -> Catalog {
    let config = HrConfig {
        assets_dir: assets.to_path_buf(),
        ..HrConfig::default()
    };
    Catalog::from_config(&config).unwrap()
}

fn request(catalog: &Catalog) -> ContractRequest {
    let company = catalog.company(&"khalij".into()).unwrap();
    let manager = catalog.managers()[1].clone();
    ContractRequest {
        labor_office: LaborOffice::Capital,
        company: company.key.clone(),
        manager_signature: catalog.resolve_signature(company, &manager),
        manager,
        manager_civil_id: "280010100001".to_string(),
        worker_name: "Ali Hassan".to_string(),
        worker_civil_id: "290020200002".to_string(),
        nationality: "مصري".to_string(),
        job: "نجار".to_string(),
        passport: "A1234567".to_string(),
        salary: "350".to_string(),
        contract_date: "2024-01-01".to_string(),
        effective_start_date: "2024-01-15".to_string(),
        nominal_start_date: "2024-02-01".to_string(),
    }
}

fn read_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    Some(out)
}

fn paragraphs(document: &str) -> Vec<&str> {
    document
        .split("<w:p>")
        .skip(1)
        .map(|p| p.split("</w:p>").next().unwrap_or_default())
        .collect()
}

#[test]
fn test_contract_structure() {
    let assets = TempDir::new().unwrap();
    let catalog = catalog(assets.path());
    let bytes = generate_contract(&catalog, &request(&catalog)).unwrap();
    let document = read_part(&bytes, "word/document.xml").unwrap();

    let paragraphs = paragraphs(&document);
    let clauses: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.contains("البند "))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clauses.len(), 16);

    let page_breaks: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.contains("w:type=\"page\""))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(page_breaks.len(), 1);
    assert!(clauses[3] < page_breaks[0] && page_breaks[0] < clauses[4]);

    assert_eq!(document.matches("<w:tbl>").count(), 1);
    assert_eq!(document.matches("<w:tc>").count(), 2);
    // Signature table closes the body, after the last clause
    let table_at = document.find("<w:tbl>").unwrap();
    assert!(document.rfind("البند ").unwrap() < table_at);
    assert!(document[table_at..].contains("الطرف الأول"));
    assert!(document.contains("الطرف الأول"));
    assert!(document.contains("الطرف الثاني"));

    assert!(document.contains("الهيئة العامة للقوى العاملة / إدارة عمل العاصمة"));
    assert!(document.contains("بمهنة نجار داخل دولة الكويت"));
    assert!(document.contains("أجرا مقداره 350 دينارا"));
    assert!(document.contains("اعتبارا من 2024-01-15"));
    assert!(document.contains("اعتبارا من 2024-02-01"));
    assert!(document.contains("تعمل في مجال المباني"));
    assert!(document.contains("<w:bidi/>"));
    assert!(document.contains("<w:rtl/>"));
}

#[test]
fn test_missing_images_are_skipped() {
    let assets = TempDir::new().unwrap();
    let catalog = catalog(assets.path());
    let bytes = generate_contract(&catalog, &request(&catalog)).unwrap();

    assert!(read_part(&bytes, "word/header1.xml").is_none());
    let document = read_part(&bytes, "word/document.xml").unwrap();
    assert!(!document.contains("<w:drawing>"));
}

#[test]
fn test_logo_and_company_signature_embedded() {
    let assets = TempDir::new().unwrap();
    png(&assets.path().join("logo_khalij.png"));
    png(&assets.path().join("sig1.png"));
    let catalog = catalog(assets.path());

    let bytes = generate_contract(&catalog, &request(&catalog)).unwrap();

    let header = read_part(&bytes, "word/header1.xml").unwrap();
    assert!(header.contains("<w:drawing>"));
    let document = read_part(&bytes, "word/document.xml").unwrap();
    assert_eq!(document.matches("<w:drawing>").count(), 1);
    // 0.8 in wide signature
    assert!(document.contains("cx=\"731520\""));
}

#[test]
fn test_first_manager_uses_default_signature() {
    let assets = TempDir::new().unwrap();
    png(&assets.path().join("sig1.png"));
    let catalog = catalog(assets.path());

    let mut req = request(&catalog);
    let company = catalog.company(&req.company).unwrap();
    req.manager = catalog.managers()[0].clone();
    req.manager_signature = catalog.resolve_signature(company, &req.manager);

    // sig2.png does not exist, so no picture even though sig1.png does
    let bytes = generate_contract(&catalog, &req).unwrap();
    let document = read_part(&bytes, "word/document.xml").unwrap();
    assert!(!document.contains("<w:drawing>"));
}

#[test]
fn test_each_required_field_is_enforced() {
    let assets = TempDir::new().unwrap();
    let catalog = catalog(assets.path());
    let base = request(&catalog);

    let clears: [(&str, fn(&mut ContractRequest)); 12] = [
        ("manager", |r: &mut ContractRequest| r.manager.clear()),
        ("manager_civil_id", |r: &mut ContractRequest| r.manager_civil_id.clear()),
        ("worker_name", |r: &mut ContractRequest| r.worker_name.clear()),
        ("worker_civil_id", |r: &mut ContractRequest| r.worker_civil_id.clear()),
        ("nationality", |r: &mut ContractRequest| r.nationality.clear()),
        ("job", |r: &mut ContractRequest| r.job.clear()),
        ("passport", |r: &mut ContractRequest| r.passport = "  ".to_string()),
        ("salary", |r: &mut ContractRequest| r.salary.clear()),
        ("contract_date", |r: &mut ContractRequest| r.contract_date.clear()),
        ("effective_start_date", |r: &mut ContractRequest| r.effective_start_date.clear()),
        ("nominal_start_date", |r: &mut ContractRequest| r.nominal_start_date.clear()),
        ("manager_signature", |r: &mut ContractRequest| r.manager_signature = Default::default()),
    ];

    for (field, clear) in clears {
        let mut req = base.clone();
        clear(&mut req);
        match generate_contract(&catalog, &req) {
            Err(HrError::MissingField(missing)) => assert_eq!(missing, field),
            other => panic!("expected MissingField({field}), got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_company() {
    let assets = TempDir::new().unwrap();
    let catalog = catalog(assets.path());
    let mut req = request(&catalog);
    req.company = "nope".into();
    assert!(matches!(
        generate_contract(&catalog, &req),
        Err(HrError::UnknownCompany(_))
    ));
}

#[test]
fn test_contract_file_name() {
    let assets = TempDir::new().unwrap();
    let catalog = catalog(assets.path());
    assert_eq!(
        contract_file_name(&catalog, &request(&catalog)).unwrap(),
        "عقد_الخليج_العالمية_لتشييد_المباني_Ali_Hassan_290020200002.docx"
    );
}
