//! End-to-end extraction over a digitally typeset filing built in memory.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use pretty_assertions::assert_eq;

use statex_core::statement::{ScaleFactor, TokenModality};
use statex_core::{
    CanonicalField, ExtractOptions, ExtractionResult, ParsingStatus, StatementExtractor,
};

/// A piece of text at `(x, y)` in PDF user space (origin bottom left).
type Cell = (i64, i64, &'static str);

/// Single-byte encoding as read through the font's WinAnsi mapping.
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u8).collect()
}

/// Codes of a subset font that starts at 0x01 for the space glyph.
fn subset_codes(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u8 - 0x1F).collect()
}

const SUBSET_TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<00> <FF>
endcodespacerange
1 beginbfrange
<01> <5F> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

fn helvetica(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Embedded-subset style font: glyph codes only make sense through its
/// `ToUnicode` map.
fn subset_font(doc: &mut Document) -> ObjectId {
    let to_unicode = doc.add_object(Stream::new(
        dictionary! {},
        SUBSET_TO_UNICODE.as_bytes().to_vec(),
    ));
    let widths: Vec<Object> = (0x01..=0x5F).map(|_| Object::Integer(500)).collect();
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "QKJRST+Frutiger-Roman",
        "FirstChar" => Object::Integer(0x01),
        "LastChar" => Object::Integer(0x5F),
        "Widths" => widths,
        "ToUnicode" => to_unicode,
    })
}

fn text_ops(cells: &[Cell], encode: fn(&str) -> Vec<u8>) -> Vec<Operation> {
    let mut ops = Vec::new();
    for (x, y, text) in cells {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), Object::Integer(10)]));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(*x), Object::Integer(*y)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn build_pdf(pages: &[Vec<Cell>]) -> Vec<u8> {
    build_pdf_with_font(pages, helvetica, latin1)
}

fn build_pdf_with_font(
    pages: &[Vec<Cell>],
    font: fn(&mut Document) -> ObjectId,
    encode: fn(&str) -> Vec<u8>,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = font(&mut doc);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for cells in pages {
        let content = Content {
            operations: text_ops(cells, encode),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(600),
                Object::Integer(800),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn profit_and_loss() -> Vec<Cell> {
    vec![
        (50, 750, "Profit and loss account"),
        (350, 730, "2023"),
        (450, 730, "2022"),
        (50, 700, "Turnover"),
        (250, 700, "2"),
        (350, 700, "1,250,000"),
        (450, 700, "1,100,000"),
        (50, 670, "Operating profit"),
        (350, 670, "310,000"),
        (450, 670, "(20,000)"),
        (50, 640, "Profit for the financial year"),
        (350, 640, "250,000"),
        (450, 640, "200,000"),
    ]
}

fn balance_sheet() -> Vec<Cell> {
    vec![
        (50, 750, "Balance sheet"),
        (350, 730, "£'000"),
        (50, 700, "Current assets"),
        (350, 700, "500"),
        (50, 670, "Creditors: amounts falling due within one year"),
        (350, 670, "(120)"),
        (50, 640, "Net current assets"),
        (350, 640, "380"),
        (50, 610, "Creditors: amounts falling due after more than one year"),
        (350, 610, "(60)"),
        (50, 580, "Net assets"),
        (350, 580, "320"),
    ]
}

fn notes() -> Vec<Cell> {
    vec![
        (50, 750, "Notes to the accounts"),
        (50, 700, "Turnover by geographical market"),
        (350, 700, "9,999,999"),
        (50, 670, "Net assets acquired in the period"),
        (350, 670, "777,777"),
    ]
}

#[test]
fn test_digital_filing_end_to_end() {
    let pdf = build_pdf(&[profit_and_loss(), balance_sheet(), notes()]);

    let result = StatementExtractor::default().extract_document(&pdf);

    let mut expected = ExtractionResult::new();
    expected.fields.is_revenue = Some(1_250_000.0);
    expected.fields.is_ebit = Some(310_000.0);
    expected.fields.is_net_income = Some(250_000.0);
    expected.fields.bs_curr_assets = Some(500_000.0);
    expected.fields.bs_curr_liab = Some(120_000.0);
    expected.fields.bs_total_liab = Some(60_000.0);
    expected.fields.bs_total_assets = Some(320_000.0);

    assert_eq!(result, expected);
}

#[test]
fn test_report_describes_each_page() {
    let pdf = build_pdf(&[profit_and_loss(), balance_sheet(), notes()]);

    let report = StatementExtractor::default()
        .extract_bytes(&pdf, &ExtractOptions::default())
        .expect("readable pdf");

    assert_eq!(report.result.parsing_status, ParsingStatus::Success);
    assert_eq!(report.pages.len(), 3);
    assert!(report.warnings.is_empty());

    assert_eq!(report.pages[0].modality, TokenModality::Digital);
    assert!(report.pages[0].financial);
    assert_eq!(report.pages[0].scale, Some(ScaleFactor::Units));
    assert_eq!(report.pages[1].scale, Some(ScaleFactor::Thousands));

    assert!(!report.pages[2].financial);
    assert_eq!(report.pages[2].updates, 0);
}

#[test]
fn test_page_budget_limits_scan() {
    let pdf = build_pdf(&[profit_and_loss(), balance_sheet()]);

    let report = StatementExtractor::default()
        .extract_bytes(&pdf, &ExtractOptions::default().with_max_pages(1))
        .expect("readable pdf");

    assert_eq!(report.result.parsing_status, ParsingStatus::Success);
    assert_eq!(report.result.get(CanonicalField::IsRevenue), Some(1_250_000.0));
    assert_eq!(report.result.get(CanonicalField::BsTotalAssets), None);
}

#[test]
fn test_identical_bytes_identical_result() {
    let pdf = build_pdf(&[profit_and_loss(), balance_sheet()]);
    let extractor = StatementExtractor::default();

    assert_eq!(extractor.extract_document(&pdf), extractor.extract_document(&pdf));
}

#[test]
fn test_subset_font_decoded_through_to_unicode() {
    let page = vec![
        (50, 750, "Balance sheet as at 31 March 2024"),
        (50, 720, "Fixed assets"),
        (350, 720, "2,000,000"),
        (50, 700, "Net assets"),
        (350, 700, "1,234,567"),
    ];
    let pdf = build_pdf_with_font(&[page], subset_font, subset_codes);

    let report = StatementExtractor::default()
        .extract_bytes(&pdf, &ExtractOptions::default())
        .expect("readable pdf");

    assert_eq!(report.pages[0].modality, TokenModality::Digital);
    assert!(report.pages[0].financial);
    assert_eq!(
        report.result.get(CanonicalField::BsTotalAssets),
        Some(1_234_567.0)
    );
}

#[test]
fn test_unreadable_pdf_is_error_record() {
    let result = StatementExtractor::default().extract_document(b"%PDF-1.5\nno objects here\n");

    assert_eq!(result.parsing_status, ParsingStatus::Error);
    assert_eq!(result.fields.populated(), 0);
}
