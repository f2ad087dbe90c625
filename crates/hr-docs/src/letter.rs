//! HR letters rendered to PDF
//!
//! A letter is composed in logical (reading) order first, then laid out on
//! A4 pages. Each wrapped line is shaped just before it is drawn, since the
//! PDF writer places glyphs strictly left to right.

use crate::catalog::{Catalog, Company, CompanyKey};
use crate::config::HrConfig;
use crate::naming::sanitize_filename;
use crate::{read_optional_image, require, HrError, Result};
use arabic_text::{shape, wrap_to_width};
use pdf_core::{mm, Align, FontFamily, FontWeight, PageSize, PdfDocument};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The four letter templates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterType {
    #[default]
    SalaryCertificate,
    UnpaidLeave,
    Leave,
    Deduction,
}

impl LetterType {
    pub const ALL: [LetterType; 4] = [
        LetterType::SalaryCertificate,
        LetterType::UnpaidLeave,
        LetterType::Leave,
        LetterType::Deduction,
    ];

    /// English name used in output file names
    pub fn file_stem(self) -> &'static str {
        match self {
            LetterType::SalaryCertificate => "SalaryCertificate",
            LetterType::UnpaidLeave => "UnpaidLeave",
            LetterType::Leave => "Leave",
            LetterType::Deduction => "Deduction",
        }
    }

    /// Heading printed on the letter
    pub fn title(self) -> &'static str {
        match self {
            LetterType::SalaryCertificate => "شهادة راتب",
            LetterType::UnpaidLeave => "إجازة بدون راتب",
            LetterType::Leave => "إجازة",
            LetterType::Deduction => "خطاب خصم",
        }
    }
}

impl FromStr for LetterType {
    type Err = String;

    /// Accepts the English file stem (any case) or the Arabic title
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        LetterType::ALL
            .into_iter()
            .find(|t| t.file_stem().eq_ignore_ascii_case(s) || t.title() == s)
            .or_else(|| (s == "خصم").then_some(LetterType::Deduction))
            .ok_or_else(|| format!("unknown letter type: {s}"))
    }
}

/// Input for one letter
///
/// `reason` and `manager` are collected with the request but no template
/// prints them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRequest {
    pub company: CompanyKey,
    pub letter_type: LetterType,
    pub name: String,
    pub civil_id: String,
    pub job_title: String,
    pub salary: String,
    pub leave_start: String,
    pub leave_end: String,
    pub reason: String,
    pub manager: String,
    pub manual_date: String,
    pub deduction_amount: Option<String>,
    pub deduction_reason: Option<String>,
}

/// Letter text in logical order, ready for layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterLayout {
    pub company_name: String,
    pub title: String,
    /// Body lines separated by `\n`; empty lines are kept as blank lines
    pub body: String,
    pub addendum: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate a request and fill its template
///
/// Fails with `MissingField` before any layout work when a field required by
/// the letter type is empty.
pub fn compose_letter(company: &Company, request: &LetterRequest) -> Result<LetterLayout> {
    let name = require("name", &request.name)?;
    let cid = require("civil_id", &request.civil_id)?;
    let company_name = company.display_name.as_str();

    let body = match request.letter_type {
        LetterType::SalaryCertificate => {
            let job = require("job_title", &request.job_title)?;
            let salary = require("salary", &request.salary)?;
            format!(
                "تشهد {company_name} بأن الموظف يعمل: {name} / {cid}\n\
                 يعمل لدينا بوظيفة: {job}\n\
                 ويتقاضى راتبًا شهريًا قدره: {salary}\n\
                 وذلك بناءً على طلبه لتقديمها إلى من يهمه الأمر."
            )
        }
        LetterType::UnpaidLeave => {
            let start = require("leave_start", &request.leave_start)?;
            let end = require("leave_end", &request.leave_end)?;
            format!(
                "نفيدكم بأن الموظف: {name} / {cid}\n\
                 قد تقدم بطلب إجازة بدون راتب للفترة من {start} إلى {end}.\n\
                 نظرًا لتمتع الموظف بإجازة خلال الفترة المحددة، لم يتم تحويل راتبه عن تلك الفترة."
            )
        }
        LetterType::Leave => {
            let start = require("leave_start", &request.leave_start)?;
            let end = require("leave_end", &request.leave_end)?;
            format!(
                "نفيدكم بأن الموظف: {name} / {cid}\n\
                 قد قدم على إجازة خلال الفترة من {start} إلى {end}."
            )
        }
        LetterType::Deduction => {
            let amount = non_empty(&request.deduction_amount)
                .ok_or(HrError::MissingField("deduction_amount"))?;
            let reason = non_empty(&request.deduction_reason)
                .ok_or(HrError::MissingField("deduction_reason"))?;
            let date = require("manual_date", &request.manual_date)?;
            format!(
                "الموضوع: خصم من راتب موظف\n\n\
                 نحيطكم علمًا بأنه قد تقرر خصم مبلغ وقدره ({amount}) دينار كويتي من راتب الموظف:\n\
                 {name} / {cid}\n\
                 وذلك بتاريخ: {date}\n\
                 بسبب: {reason}.\n\n\
                 يرجى التكرم باتخاذ اللازم وتنفيذ الخصم في كشف رواتب الشهر الحالي.\n\n\
                 وتفضلوا بقبول فائق الاحترام والتقدير،،،"
            )
        }
    };

    // Any non-empty text counts, including "0"
    let addendum = match (
        request.letter_type,
        non_empty(&request.deduction_amount),
        non_empty(&request.deduction_reason),
    ) {
        (LetterType::Deduction, _, _) => None,
        (_, Some(amount), Some(reason)) => {
            Some(format!("تم خصم مبلغ قدره {amount} من الموظف بسبب: {reason}"))
        }
        _ => None,
    };

    Ok(LetterLayout {
        company_name: company_name.to_string(),
        title: request.letter_type.title().to_string(),
        body,
        addendum,
    })
}

/// TrueType font data for letters
#[derive(Debug, Clone)]
pub struct LetterFonts {
    pub regular: Vec<u8>,
    pub bold: Option<Vec<u8>>,
}

impl LetterFonts {
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Self {
        Self { regular, bold }
    }

    /// Read the configured font files
    pub fn load(config: &HrConfig) -> Result<Self> {
        let read = |path: &std::path::Path| {
            let path = config.asset_path(path);
            std::fs::read(&path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => HrError::NotFound(path),
                _ => HrError::Io(e),
            })
        };
        let regular = read(&config.fonts.regular)?;
        let bold = config.fonts.bold.as_deref().map(read).transpose()?;
        Ok(Self { regular, bold })
    }
}

// Page metrics in millimetres
const MARGIN: f64 = 10.0;
const BOTTOM_MARGIN: f64 = 20.0;
/// Horizontal padding inside a text cell
const CELL_PADDING: f64 = 1.0;
const LOGO_X: f64 = 150.0;
const LOGO_Y: f64 = 8.0;
const LOGO_WIDTH: f64 = 40.0;
const HEADER_CELL: f64 = 10.0;
const HEADER_GAP: f64 = 10.0;
const TITLE_GAP: f64 = 20.0;
const TITLE_CELL: f64 = 14.0;
const TITLE_AFTER: f64 = 8.0;
const LINE: f64 = 8.0;
const ADDENDUM_GAP: f64 = 4.0;

const HEADER_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 18.0;

const FAMILY: &str = "letter";

struct LetterWriter<'a> {
    doc: PdfDocument,
    layout: &'a LetterLayout,
    logo: Option<&'a [u8]>,
    page: usize,
    /// Top of the next cell, in points from the top of the page
    y: f64,
}

impl<'a> LetterWriter<'a> {
    fn page_width(&self) -> f64 {
        self.doc.page_size().width
    }

    fn new_page(&mut self) -> Result<()> {
        self.page = self.doc.add_page();

        if let Some(logo) = self.logo {
            let placed =
                self.doc
                    .insert_image(logo, self.page, mm(LOGO_X), mm(LOGO_Y), mm(LOGO_WIDTH));
            if let Err(e) = placed {
                tracing::warn!(error = %e, "logo could not be embedded, skipping");
                self.logo = None;
            }
        }

        self.doc.set_font(FAMILY, HEADER_SIZE)?;
        self.doc.set_font_weight(FontWeight::Bold)?;
        let baseline = baseline(mm(MARGIN), mm(HEADER_CELL), HEADER_SIZE);
        let right = self.page_width() - mm(MARGIN + CELL_PADDING);
        let name = shape(self.layout.company_name.trim());
        self.doc
            .insert_text(&name, self.page, right, baseline, Align::Right)?;

        self.doc.set_font(FAMILY, TEXT_SIZE)?;
        self.doc.set_font_weight(FontWeight::Regular)?;
        self.y = mm(MARGIN + HEADER_CELL + HEADER_GAP);
        Ok(())
    }

    /// Draw one centered line in a cell of `height` mm, breaking the page first if needed
    fn centered_line(&mut self, logical: &str, height: f64) -> Result<()> {
        let page_height = self.doc.page_size().height;
        if self.y + mm(height) > page_height - mm(BOTTOM_MARGIN) {
            self.new_page()?;
        }
        let text = shape(logical);
        let baseline = baseline(self.y, mm(height), TEXT_SIZE);
        self.doc.insert_text(
            &text,
            self.page,
            self.page_width() / 2.0,
            baseline,
            Align::Center,
        )?;
        self.y += mm(height);
        Ok(())
    }

    /// Wrap and draw a multi-line paragraph in `LINE` mm rows
    fn paragraph(&mut self, text: &str) -> Result<()> {
        let max_width = self.page_width() - mm(2.0 * (MARGIN + CELL_PADDING));
        for logical in text.trim().split('\n') {
            let lines = {
                let doc = &self.doc;
                wrap_to_width(logical, max_width, |candidate| {
                    doc.get_text_width(&shape(candidate)).unwrap_or(0.0)
                })
            };
            for line in lines {
                self.centered_line(&line, LINE)?;
            }
        }
        Ok(())
    }
}

/// Baseline for text vertically centered in a cell starting at `top`
fn baseline(top: f64, height: f64, font_size: f32) -> f64 {
    top + height / 2.0 + 0.3 * font_size as f64
}

/// Lay out a composed letter on A4 pages
pub fn render_letter(
    layout: &LetterLayout,
    logo: Option<&[u8]>,
    fonts: &LetterFonts,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(PageSize::A4);
    doc.register_font_family(
        FAMILY,
        FontFamily::from_ttf(FAMILY, &fonts.regular, fonts.bold.as_deref())?,
    )?;
    doc.set_title(&layout.title);

    let mut writer = LetterWriter {
        doc,
        layout,
        logo,
        page: 0,
        y: 0.0,
    };
    writer.new_page()?;

    writer.y += mm(TITLE_GAP);
    writer.centered_line(&layout.title, TITLE_CELL)?;
    writer.y += mm(TITLE_AFTER);

    writer.paragraph(&layout.body)?;
    if let Some(addendum) = &layout.addendum {
        writer.y += mm(ADDENDUM_GAP);
        writer.paragraph(addendum)?;
    }

    let pages = writer.doc.page_count();
    let bytes = writer.doc.into_bytes()?;
    tracing::debug!(pages, bytes = bytes.len(), "rendered letter");
    Ok(bytes)
}

/// Compose and render a letter for the request's company
pub fn generate_letter(
    catalog: &Catalog,
    fonts: &LetterFonts,
    request: &LetterRequest,
) -> Result<Vec<u8>> {
    let company = catalog.company(&request.company)?;
    let layout = compose_letter(company, request)?;
    let logo = read_optional_image(company.logo.as_deref());

    tracing::info!(
        company = %company.key,
        letter = request.letter_type.file_stem(),
        employee = %request.name,
        "generating letter"
    );
    render_letter(&layout, logo.as_deref(), fonts)
}

/// `{LetterType}_{employee}.pdf`
pub fn letter_file_name(request: &LetterRequest) -> String {
    format!(
        "{}_{}.pdf",
        request.letter_type.file_stem(),
        sanitize_filename(&request.name)
    )
}
