//! Invoice PDF rendering.
//!
//! Pages are A4, text is set in the base-14 Helvetica font with the standard
//! WinAnsi encoding, so accented French labels and the euro sign need no
//! embedded font.

use crate::{
    errors::ServiceError,
    services::invoices::{InvoiceDocument, InvoiceTotals, VAT_RATE},
};
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use rust_decimal::Decimal;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const LEFT_MARGIN: i64 = 50;
const TOP: i64 = 790;
const BOTTOM_MARGIN: i64 = 50;
const LINE_HEIGHT: i64 = 18;
const FONT_SIZE: i64 = 12;
const DESCRIPTION_WIDTH: usize = 38;

const QUANTITY_X: i64 = 320;
const UNIT_PRICE_X: i64 = 390;
const TOTAL_X: i64 = 480;

/// Renders an invoice with its client and lines into PDF bytes
pub fn render_invoice(company_name: &str, document: &InvoiceDocument) -> Result<Vec<u8>, ServiceError> {
    let invoice = &document.invoice;
    let mut layout = Layout::new();

    layout.text_line(company_name);
    layout.skip();
    layout.text_line(&format!("Facture n° {}", invoice.invoice_number));
    layout.text_line(&format!("Client : {}", document.client.display_name()));
    layout.text_line(&format!("Date : {}", invoice.issued_at.format("%d/%m/%Y")));
    if let Some(notes) = &invoice.notes {
        layout.text_line(&format!("Notes : {}", notes));
    }
    layout.skip();

    layout.row(&[
        (LEFT_MARGIN, "Désignation".to_string()),
        (QUANTITY_X, "Qté".to_string()),
        (UNIT_PRICE_X, "PU HT".to_string()),
        (TOTAL_X, "Total HT".to_string()),
    ]);
    for line in &document.lines {
        layout.row(&[
            (LEFT_MARGIN, truncate(&line.description, DESCRIPTION_WIDTH)),
            (QUANTITY_X, line.quantity.normalize().to_string()),
            (UNIT_PRICE_X, money(line.unit_price_ht)),
            (TOTAL_X, money(line.line_total_ht)),
        ]);
    }
    layout.skip();

    let totals = InvoiceTotals::of_invoice(invoice);
    let vat_percent = (VAT_RATE * Decimal::ONE_HUNDRED).normalize();
    layout.text_line(&format!("Total HT : {}", money(totals.total_ht)));
    layout.text_line(&format!("TVA ({} %) : {}", vat_percent, money(totals.vat)));
    layout.text_line(&format!("Total TTC : {}", money(totals.total_ttc)));

    assemble(layout.finish())
}

fn money(amount: Decimal) -> String {
    format!("{:.2} €", amount)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Top-down text cursor that breaks onto a new page at the bottom margin
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: TOP,
        }
    }

    fn text_line(&mut self, text: &str) {
        self.row(&[(LEFT_MARGIN, text.to_string())]);
    }

    fn row(&mut self, cells: &[(i64, String)]) {
        if self.y < BOTTOM_MARGIN {
            self.break_page();
        }
        for (x, text) in cells {
            self.current.extend(text_at(*x, self.y, text));
        }
        self.y -= LINE_HEIGHT;
    }

    fn skip(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = TOP;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.current);
        self.pages
    }
}

fn text_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
        ),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ServiceError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| ServiceError::InternalError(format!("PDF content encoding failed: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
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
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ServiceError::InternalError(format!("PDF serialization failed: {}", e)))?;
    Ok(buffer)
}

/// Maps text onto the WinAnsi (CP1252) code page; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}
