//! Employment contracts rendered to DOCX
//!
//! The word processor handles right-to-left layout itself, so text is passed
//! through in logical order with right-to-left paragraph and run flags.

use crate::catalog::{Catalog, CompanyKey};
use crate::naming::sanitize_filename;
use crate::{read_optional_image, require, Result};
use docx_core::{Alignment, DocxDocument, Length, Paragraph, Run, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Labor offices a contract can be registered with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaborOffice {
    #[default]
    Hawalli,
    Capital,
    Farwaniya,
}

impl LaborOffice {
    pub const ALL: [LaborOffice; 3] = [
        LaborOffice::Hawalli,
        LaborOffice::Capital,
        LaborOffice::Farwaniya,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LaborOffice::Hawalli => "إدارة عمل حولى",
            LaborOffice::Capital => "إدارة عمل العاصمة",
            LaborOffice::Farwaniya => "إدارة عمل الفروانية",
        }
    }
}

impl fmt::Display for LaborOffice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaborOffice {
    type Err = String;

    /// Accepts the variant name (any case) or the Arabic office name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        LaborOffice::ALL
            .into_iter()
            .find(|o| format!("{o:?}").eq_ignore_ascii_case(s) || o.name() == s)
            .ok_or_else(|| format!("unknown labor office: {s}"))
    }
}

/// Input for one contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub labor_office: LaborOffice,
    pub company: CompanyKey,
    pub manager: String,
    pub manager_civil_id: String,
    pub worker_name: String,
    pub worker_civil_id: String,
    pub nationality: String,
    pub job: String,
    pub passport: String,
    pub salary: String,
    pub contract_date: String,
    /// Date the contract takes effect
    pub effective_start_date: String,
    /// Start of the contract term
    pub nominal_start_date: String,
    /// Signature image for the first party, normally from `Catalog::resolve_signature`
    pub manager_signature: PathBuf,
}

/// Validated request fields, trimmed
struct Fields<'a> {
    company: &'a str,
    industry: &'a str,
    manager: &'a str,
    manager_civil_id: &'a str,
    worker_name: &'a str,
    worker_civil_id: &'a str,
    nationality: &'a str,
    job: &'a str,
    passport: &'a str,
    salary: &'a str,
    contract_date: &'a str,
    effective_start_date: &'a str,
    nominal_start_date: &'a str,
}

impl Fields<'_> {
    /// Value for a `{placeholder}` in clause text
    fn get(&self, key: &str) -> Option<&str> {
        Some(match key {
            "company" => self.company,
            "industry" => self.industry,
            "job" => self.job,
            "salary" => self.salary,
            "start_date" => self.effective_start_date,
            "real_start" => self.nominal_start_date,
            _ => return None,
        })
    }
}

/// One numbered contract clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub heading: &'static str,
    /// Body text; `{name}` placeholders are filled from the request
    pub body: &'static str,
    /// True when the body has no placeholders
    pub boilerplate: bool,
    pub page_break_after: bool,
}

const fn clause(heading: &'static str, body: &'static str) -> Clause {
    Clause {
        heading,
        body,
        boilerplate: true,
        page_break_after: false,
    }
}

const fn templated(heading: &'static str, body: &'static str) -> Clause {
    Clause {
        heading,
        body,
        boilerplate: false,
        page_break_after: false,
    }
}

const fn break_after(clause: Clause) -> Clause {
    Clause {
        page_break_after: true,
        ..clause
    }
}

/// The sixteen clauses, in order
pub const CLAUSES: [Clause; 16] = [
    clause("البند الأول", "يعتبر التمهيد السابق جزءا لا يتجزأ من هذا العقد ."),
    templated(
        "البند الثاني",
        "\" طبيعة العمل \"\nتعاقد الطرف الأول مع الطرف الثاني للعمل لديه بمهنة {job} داخل دولة الكويت.",
    ),
    clause(
        "البند الثالث",
        "\" فترة التجربة \"\nيخضع الطرف الثاني لفترة تجربة لمدة لا تزيد عن 100 يوم عمل ، ويحق لكل طرف إنهاء العقد خلال تلك الفترة دون إخطار",
    ),
    break_after(templated(
        "البند الرابع",
        "\" قيمة الأجر \"\nيتقاضى الطرف الثاني عن تنفيذ هذا العقد أجرا مقداره {salary} دينارا يدفع في نهاية كل شهر ولا يجوز للطرف الأول تخفيض الأجر أثناء سريان هذا العقد . ولا يجوز نقل الطرف الثاني إلى الأجر اليومي دون موافقته .",
    )),
    templated(
        "البند الخامس",
        "\" نفاذ العقد \"\nيبدأ نفاذ العقد اعتبارا من {start_date} ويلتزم الطرف الثاني بالقيام بأداء عمله طوال مدة نفاذة",
    ),
    templated(
        "البند السادس",
        "\" مدة العقد \"\n-هذا العقد غير محدد المدة ويبدأ اعتبارا من {real_start} ولمدة سنة ، ويجوز تجديد العقد بموافقة الطرفين لمدد مماثلة بحد أقصى سنة ميلادية.",
    ),
    clause(
        "البند السابع",
        "\" الإجازة السنوية \"\nللطرف الثاني الحق في إجازة سنوية مدفوعة الأجر مدتها 30 يوما ، ولا يستحقها عن السنة الأولى إلا بعد انقضاء مدة تسعة أشهر تحسب من تاريخ نفاذ العقد .",
    ),
    clause(
        "البند الثامن",
        "\" عدد ساعات العمل \"\nلا يجوز للطرف الأول تشغيل الطرف الثاني لمدة تزيد عن ثماني ساعات عمل يوميا تتخللها فترة راحة لا تقل عن ساعة باستثناء الحالات المقررة قانونا .",
    ),
    clause(
        "البند التاسع",
        "\" قيمة تذكرة السفر \"\nيتحمل الطرف الأول مصاريف عودة الطرف الثاني إلى بلده عند انتهاء علاقة العمل ومغادرته نهائيا للبلاد.",
    ),
    clause(
        "البند العاشر",
        "\" التأمين ضد إصابات وأمراض العمل \"\nيلتزم الطرف الأول بالتأمين على الطرف الثانى ضد إصابات وأمراض العمل ، كما يلتزم بقيمة التأمين الصحى طبقا للقانون رقم (1) لسنة 1999 .",
    ),
    clause(
        "البند الحادى عشر",
        "\" مكافأة نهاية الخدمة \"\nيستحق الطرف الثان مكافأة نهاية الخدمة المنصوص عليها بالقوانين المنظمة",
    ),
    clause(
        "البند الثانى عشر",
        "\" القانون الواجب التطبيق \"\nتسري أحكام قانون العمل في القطاع الأهلي رقم 6 لسنة 2010 والقرارات المنفذة له فيما لم يرد بشأنه نص في هذا العقد ، ويقع باطلا كل شرط تم الاتفاق عليه بالمخالفة لأحكام القانون ، ما لم يكن فيه ميزة أفضل للعامل .",
    ),
    clause("البند الثالث عشر", "\"شروط خاصة \"\n1 لا\n2 لا\n3 لا"),
    clause(
        "البند الرابع عشر",
        "\" المحكمة المختصة \"\nتختص المحكمة الكلية ودوائرها العمالية طبقا لأحكام القانون رقم 46 لسنة 1987 ، بنظر كافة المنازعات الناشئة عن تطبيق أو تفسير هذا العقد.",
    ),
    clause(
        "البند الخامس عشر",
        "\" لغة العقد \"\nحرر هذا العقد باللغه العربيه ، ويعتد بنصوص اللغة العربية عند وقوع أى تعارض .",
    ),
    clause(
        "البند السادس عشر",
        "\" نسخ العقد \"\nحرر هذا العقد من ثلاث نسخ بيد كل طرف نسخة للعمل بموجبها والثالثة تودع لدى الهيئة العامة للقوى العاملة.",
    ),
];

/// Replace `{name}` placeholders; unknown names are left as written
fn fill(template: &str, fields: &Fields<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match fields.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..open + close + 2]),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Right-aligned right-to-left paragraph
fn rtl(text: String) -> Paragraph {
    Paragraph::new()
        .align(Alignment::Right)
        .bidi()
        .run(Run::new(text).rtl())
}

fn centered(text: String) -> Paragraph {
    Paragraph::new().align(Alignment::Center).text(text)
}

const FORM_TITLE: &str = "نموذج عقد عمل في القطاع الأهلي";
const LOGO_WIDTH_IN: f64 = 1.4;
const SIGNATURE_WIDTH_IN: f64 = 0.8;

/// Build the contract document
///
/// Every text field must be non-empty; validation runs before anything is
/// built. A missing logo or signature image is skipped.
pub fn generate_contract(catalog: &Catalog, request: &ContractRequest) -> Result<Vec<u8>> {
    let company = catalog.company(&request.company)?;
    let fields = Fields {
        company: require("company", &company.display_name)?,
        industry: company.industry.trim(),
        manager: require("manager", &request.manager)?,
        manager_civil_id: require("manager_civil_id", &request.manager_civil_id)?,
        worker_name: require("worker_name", &request.worker_name)?,
        worker_civil_id: require("worker_civil_id", &request.worker_civil_id)?,
        nationality: require("nationality", &request.nationality)?,
        job: require("job", &request.job)?,
        passport: require("passport", &request.passport)?,
        salary: require("salary", &request.salary)?,
        contract_date: require("contract_date", &request.contract_date)?,
        effective_start_date: require("effective_start_date", &request.effective_start_date)?,
        nominal_start_date: require("nominal_start_date", &request.nominal_start_date)?,
    };
    let signature_path = request.manager_signature.to_string_lossy();
    require("manager_signature", &signature_path)?;

    tracing::info!(
        company = %company.key,
        worker = fields.worker_name,
        office = %request.labor_office,
        "generating contract"
    );

    let mut doc = DocxDocument::new();
    doc.title = Some(FORM_TITLE.to_string());

    if let Some(logo) = read_optional_image(company.logo.as_deref()) {
        if let Err(e) = doc.set_header_picture(&logo, Length::inches(LOGO_WIDTH_IN)) {
            tracing::warn!(error = %e, "logo could not be embedded, skipping");
        }
    }

    doc.add_paragraph(centered(FORM_TITLE.to_string()));
    doc.add_paragraph(centered("دولة الكويت".to_string()));
    doc.add_paragraph(centered(format!(
        "الهيئة العامة للقوى العاملة / {}",
        request.labor_office
    )));
    doc.add_paragraph(centered(format!("إنه في يوم {}", fields.contract_date)));

    doc.add_paragraph(rtl("تحرر هذا العقد بين كل من :".to_string()));
    doc.add_paragraph(rtl(format!(
        "1- {}\nويمثلها في التوقيع على العقد:\nالاسم: {}\nرقم مدني / {}\n\" طرف اول \"",
        fields.company, fields.manager, fields.manager_civil_id
    )));
    doc.add_paragraph(rtl(format!(
        "2- الاسم: {}\nالجنسية: {}\nرقم مدني: {}\nرقم الجواز: {}\n\" طرف ثان \"",
        fields.worker_name, fields.nationality, fields.worker_civil_id, fields.passport
    )));
    doc.add_paragraph(rtl(fill(
        "تمهيد\nيمتلك الطرف الأول منشأة باسم/ {company} تعمل في مجال {industry} ويرغب فى التعاقد مع الطرف الثاني للعمل لديه بمهنة {job} وبعد أن أقر الطرفان بأهليتهما في إبرام هذا العقد تم الاتفاق علي ما يلي:",
        &fields,
    )));

    for clause in &CLAUSES {
        doc.add_paragraph(
            Paragraph::new()
                .align(Alignment::Right)
                .bidi()
                .run(Run::new(clause.heading).bold().rtl())
                .run(Run::new(format!("\n{}", fill(clause.body, &fields))).rtl()),
        );
        if clause.page_break_after {
            doc.add_page_break();
        }
    }

    doc.add_paragraph(Paragraph::new().text("\n\n"));
    let signatures = signature_table(&mut doc, request)?;
    doc.add_table(signatures);

    let bytes = doc.to_bytes()?;
    tracing::debug!(bytes = bytes.len(), "rendered contract");
    Ok(bytes)
}

/// One row: first party with signature image, second party left blank
fn signature_table(doc: &mut DocxDocument, request: &ContractRequest) -> Result<Table> {
    let mut table = Table::new(1, 2);

    let mut first = Paragraph::new()
        .align(Alignment::Right)
        .run(Run::new("الطرف الأول").bold());
    if let Some(image) = read_optional_image(Some(&request.manager_signature)) {
        match doc.add_picture(&image, Length::inches(SIGNATURE_WIDTH_IN)) {
            Ok(picture) => first = first.picture(picture),
            Err(e) => tracing::warn!(error = %e, "signature could not be embedded, skipping"),
        }
    }
    table.cell_mut(0, 0)?.add_paragraph(first);
    table.cell_mut(0, 1)?.add_paragraph(
        Paragraph::new()
            .align(Alignment::Left)
            .run(Run::new("الطرف الثاني").bold()),
    );
    Ok(table)
}

/// `عقد_{company}_{worker}_{civil id}.docx`
pub fn contract_file_name(catalog: &Catalog, request: &ContractRequest) -> Result<String> {
    let company = catalog.company(&request.company)?;
    Ok(format!(
        "عقد_{}_{}_{}.docx",
        sanitize_filename(&company.display_name),
        sanitize_filename(&request.worker_name),
        sanitize_filename(&request.worker_civil_id)
    ))
}
