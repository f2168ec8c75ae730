//! # Invoice Rendering
//!
//! Lays an [`Invoice`] out on A4 pages.
//!
//! ## Page Anatomy
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ COMPANY NAME                              TAX INVOICE    │
//! │ address / city / contact             Invoice No: INV-…   │
//! │ GSTIN | PAN                          Date, Due, Status   │
//! ├──────────────────────────────────────────────────────────┤
//! │ Bill To: customer, address, GSTIN, phone, email          │
//! │┌────┬──────────────────────┬───────┬──────────┬─────────┐│
//! ││ #  │ Item                 │   Qty │     Rate │  Amount ││ ◄ repeated
//! │├────┼──────────────────────┼───────┼──────────┼─────────┤│   per page
//! ││ 1  │ Widget               │     2 │ Rs. 1.00 │ Rs. 2.00││
//! ││    │   description        │       │          │         ││
//! │└────┴──────────────────────┴───────┴──────────┴─────────┘│
//! │                             Subtotal / CGST / SGST / Total│
//! │ Notes, Bank Details, disclaimer, thank-you               │
//! │                       Page i of n                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

use bizvoice_core::{BusinessProfile, Invoice, InvoiceItem, Money, TaxSplit};
use tracing::debug;

use crate::error::RenderResult;
use crate::layout::{
    build_document, fit_text, wrap_text, Font, Layout, CONTENT_RIGHT, MARGIN,
};

// Table columns: left edges for text, right edges for numbers.
const COL_INDEX: f32 = MARGIN;
const COL_ITEM: f32 = 65.0;
const COL_ITEM_WIDTH: f32 = 230.0;
const COL_QTY_RIGHT: f32 = 360.0;
const COL_RATE_RIGHT: f32 = 460.0;
const COL_AMOUNT_RIGHT: f32 = CONTENT_RIGHT;

const TABLE_HEADER_HEIGHT: f32 = 18.0;
const ROW_HEIGHT: f32 = 16.0;
const DESCRIPTION_HEIGHT: f32 = 12.0;
const LINE: f32 = 13.0;

const BODY_SIZE: f32 = 9.0;
const SMALL_SIZE: f32 = 8.0;

pub const DISCLAIMER: &str =
    "This is a computer generated invoice and does not require a signature.";
pub const THANK_YOU: &str = "Thank you for your business!";

/// Renders an invoice to PDF bytes.
///
/// Pure and deterministic: the same invoice always produces the same bytes.
pub fn render_invoice(invoice: &Invoice) -> RenderResult<Vec<u8>> {
    let mut layout = Layout::new();

    draw_header(&mut layout, invoice);
    draw_bill_to(&mut layout, invoice)?;
    draw_items(&mut layout, &invoice.items)?;
    draw_totals(&mut layout, invoice)?;
    draw_notes(&mut layout, invoice.notes.as_deref())?;
    draw_bank_details(&mut layout, invoice)?;
    draw_footer(&mut layout)?;

    let pages = layout.page_count();
    let bytes = build_document(layout.finish(), &invoice.invoice_number)?;

    debug!(
        invoice_number = %invoice.invoice_number,
        items = invoice.items.len(),
        pages,
        bytes = bytes.len(),
        "Rendered invoice"
    );

    Ok(bytes)
}

/// Returns the trimmed value if it has any content.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// "Pune, Maharashtra - 411001" from whichever parts exist.
fn locality(city: &Option<String>, state: &Option<String>, pincode: &Option<String>) -> Option<String> {
    let place = [present(city), present(state)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

    match (place.is_empty(), present(pincode)) {
        (true, None) => None,
        (true, Some(pin)) => Some(pin.to_string()),
        (false, None) => Some(place),
        (false, Some(pin)) => Some(format!("{} - {}", place, pin)),
    }
}

/// Formats a quantity without trailing zeros: 2, 1.5, 0.125.
pub fn format_quantity(quantity: f64) -> String {
    trim_decimal(format!("{:.3}", quantity))
}

/// Formats a percentage without trailing zeros: 9, 2.5, 0.25.
pub fn format_percent(percent: f64) -> String {
    trim_decimal(format!("{:.2}", percent))
}

fn trim_decimal(formatted: String) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

// =============================================================================
// Sections
// =============================================================================

fn draw_header(layout: &mut Layout, invoice: &Invoice) {
    let profile = invoice.business_profile.clone().unwrap_or_default();
    let top = layout.y();

    // Left column: who is billing
    let mut left = Vec::new();
    for line in [&profile.address_line1, &profile.address_line2] {
        if let Some(line) = present(line) {
            left.push(line.to_string());
        }
    }
    if let Some(place) = locality(&profile.city, &profile.state, &profile.pincode) {
        left.push(place);
    }
    if let Some(country) = present(&profile.country) {
        left.push(country.to_string());
    }
    if let Some(contact) = contact_line(&profile) {
        left.push(contact);
    }
    let registration = [
        present(&profile.gst_number).map(|g| format!("GSTIN: {}", g)),
        present(&profile.pan_number).map(|p| format!("PAN: {}", p)),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" | ");
    if !registration.is_empty() {
        left.push(registration);
    }

    let name = fit_text(profile.company_name.trim(), 330.0, 18.0);
    layout.text(MARGIN, top - 18.0, Font::Bold, 18.0, &name);
    let mut left_y = top - 18.0 - 16.0;
    for line in &left {
        layout.text(MARGIN, left_y, Font::Regular, BODY_SIZE, &fit_text(line, 330.0, BODY_SIZE));
        left_y -= 12.0;
    }

    // Right column: the document itself
    let mut right = vec![
        format!("Invoice No: {}", invoice.invoice_number),
        format!("Date: {}", invoice.invoice_date.format("%d/%m/%Y")),
    ];
    if let Some(due) = invoice.due_date {
        right.push(format!("Due Date: {}", due.format("%d/%m/%Y")));
    }
    right.push(format!("Status: {}", invoice.status.as_str().to_uppercase()));
    if let Some(code) = present(&profile.state_code) {
        right.push(format!("State Code: {}", code));
    }

    layout.text_right(CONTENT_RIGHT, top - 16.0, Font::Bold, 16.0, "TAX INVOICE");
    let mut right_y = top - 16.0 - 16.0;
    for line in &right {
        layout.text_right(CONTENT_RIGHT, right_y, Font::Regular, BODY_SIZE, line);
        right_y -= 12.0;
    }

    let bottom = left_y.min(right_y);
    layout.advance(layout.y() - bottom);
    layout.rule(MARGIN, CONTENT_RIGHT, layout.y(), 1.0);
    layout.advance(18.0);
}

fn contact_line(profile: &BusinessProfile) -> Option<String> {
    let parts = [
        present(&profile.phone).map(|p| format!("Phone: {}", p)),
        present(&profile.email).map(|e| format!("Email: {}", e)),
        present(&profile.website).map(|w| w.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn draw_bill_to(layout: &mut Layout, invoice: &Invoice) -> RenderResult<()> {
    let customer = &invoice.customer;

    layout.text(MARGIN, layout.y(), Font::Bold, 10.0, "Bill To:");
    layout.advance(LINE);
    layout.text(MARGIN, layout.y(), Font::Bold, 11.0, &fit_text(&customer.name, 400.0, 11.0));
    layout.advance(LINE);

    let mut lines = Vec::new();
    if let Some(address) = present(&customer.address) {
        lines.extend(wrap_text(address, 400.0, BODY_SIZE));
    }
    if let Some(place) = locality(&customer.city, &customer.state, &customer.pincode) {
        lines.push(place);
    }
    if let Some(gst) = present(&customer.gst_number) {
        lines.push(format!("GSTIN: {}", gst));
    }
    if let Some(phone) = present(&customer.phone) {
        lines.push(format!("Phone: {}", phone));
    }
    if let Some(email) = present(&customer.email) {
        lines.push(format!("Email: {}", email));
    }

    // Long addresses may push the contact lines onto the next page
    for line in &lines {
        layout.ensure_space(12.0)?;
        layout.text(MARGIN, layout.y(), Font::Regular, BODY_SIZE, line);
        layout.advance(12.0);
    }
    layout.advance(10.0);
    Ok(())
}

fn draw_table_header(layout: &mut Layout) {
    let y = layout.y();
    layout.fill_rect(
        MARGIN,
        y - TABLE_HEADER_HEIGHT + 5.0,
        CONTENT_RIGHT - MARGIN,
        TABLE_HEADER_HEIGHT,
        0.9,
    );
    let baseline = y - 8.0;
    layout.text(COL_INDEX + 4.0, baseline, Font::Bold, BODY_SIZE, "#");
    layout.text(COL_ITEM, baseline, Font::Bold, BODY_SIZE, "Item");
    layout.text_right(COL_QTY_RIGHT, baseline, Font::Bold, BODY_SIZE, "Qty");
    layout.text_right(COL_RATE_RIGHT, baseline, Font::Bold, BODY_SIZE, "Rate");
    layout.text_right(COL_AMOUNT_RIGHT - 4.0, baseline, Font::Bold, BODY_SIZE, "Amount");
    layout.advance(TABLE_HEADER_HEIGHT + 6.0);
}

fn draw_items(layout: &mut Layout, items: &[InvoiceItem]) -> RenderResult<()> {
    layout.ensure_space(TABLE_HEADER_HEIGHT + ROW_HEIGHT)?;
    draw_table_header(layout);

    for (index, item) in items.iter().enumerate() {
        let description = present(&item.description);
        let height = ROW_HEIGHT + if description.is_some() { DESCRIPTION_HEIGHT } else { 0.0 };

        if layout.ensure_space(height)? {
            draw_table_header(layout);
        }

        let y = layout.y();
        layout.text(COL_INDEX + 4.0, y, Font::Regular, BODY_SIZE, &(index + 1).to_string());
        layout.text(
            COL_ITEM,
            y,
            Font::Regular,
            BODY_SIZE,
            &fit_text(&item.product_name, COL_ITEM_WIDTH, BODY_SIZE),
        );
        layout.text_right(COL_QTY_RIGHT, y, Font::Regular, BODY_SIZE, &format_quantity(item.quantity));
        layout.text_right(COL_RATE_RIGHT, y, Font::Regular, BODY_SIZE, &item.rate().to_string());
        layout.text_right(COL_AMOUNT_RIGHT - 4.0, y, Font::Regular, BODY_SIZE, &item.amount().to_string());

        if let Some(description) = description {
            layout.gray(0.4);
            layout.text(
                COL_ITEM + 8.0,
                y - DESCRIPTION_HEIGHT,
                Font::Regular,
                SMALL_SIZE,
                &fit_text(description, COL_ITEM_WIDTH - 8.0, SMALL_SIZE),
            );
            layout.gray(0.0);
        }

        layout.advance(height);
    }

    layout.rule(MARGIN, CONTENT_RIGHT, layout.y() + 6.0, 0.5);
    layout.advance(8.0);
    Ok(())
}

fn draw_totals(layout: &mut Layout, invoice: &Invoice) -> RenderResult<()> {
    let split = TaxSplit::of(invoice);
    let half = format_percent(split.half_rate);

    let rows: [(String, Money, Font); 4] = [
        ("Subtotal".to_string(), invoice.subtotal(), Font::Regular),
        (format!("CGST @ {}%", half), split.cgst, Font::Regular),
        (format!("SGST @ {}%", half), split.sgst, Font::Regular),
        ("Total".to_string(), invoice.total(), Font::Bold),
    ];

    layout.ensure_space(rows.len() as f32 * ROW_HEIGHT + 6.0)?;

    for (label, amount, font) in &rows {
        let size = if *font == Font::Bold { 11.0 } else { 10.0 };
        if *font == Font::Bold {
            layout.rule(COL_QTY_RIGHT, CONTENT_RIGHT, layout.y() + 11.0, 0.5);
        }
        let y = layout.y();
        layout.text_right(COL_RATE_RIGHT, y, *font, size, label);
        layout.text_right(COL_AMOUNT_RIGHT - 4.0, y, *font, size, &amount.to_string());
        layout.advance(ROW_HEIGHT);
    }

    layout.advance(10.0);
    Ok(())
}

fn draw_notes(layout: &mut Layout, notes: Option<&str>) -> RenderResult<()> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(());
    };

    layout.ensure_space(LINE * 2.0)?;
    layout.text(MARGIN, layout.y(), Font::Bold, 10.0, "Notes:");
    layout.advance(LINE);

    for line in wrap_text(notes, CONTENT_RIGHT - MARGIN, BODY_SIZE) {
        layout.ensure_space(12.0)?;
        layout.text(MARGIN, layout.y(), Font::Regular, BODY_SIZE, &line);
        layout.advance(12.0);
    }

    layout.advance(8.0);
    Ok(())
}

fn draw_bank_details(layout: &mut Layout, invoice: &Invoice) -> RenderResult<()> {
    if invoice.business_profile.is_none() {
        return Ok(());
    }
    let Some(bank) = invoice.effective_bank_details() else {
        return Ok(());
    };

    let lines: Vec<String> = [
        ("Bank", &bank.bank_name),
        ("A/C No", &bank.account_number),
        ("IFSC", &bank.ifsc_code),
        ("A/C Holder", &bank.account_holder),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("{}: {}", label, value.trim()))
    .collect();

    if lines.is_empty() {
        return Ok(());
    }

    layout.ensure_space(LINE + lines.len() as f32 * 12.0)?;
    layout.text(MARGIN, layout.y(), Font::Bold, 10.0, "Bank Details:");
    layout.advance(LINE);
    for line in &lines {
        layout.text(MARGIN, layout.y(), Font::Regular, BODY_SIZE, line);
        layout.advance(12.0);
    }

    layout.advance(8.0);
    Ok(())
}

fn draw_footer(layout: &mut Layout) -> RenderResult<()> {
    layout.ensure_space(36.0)?;
    layout.rule(MARGIN, CONTENT_RIGHT, layout.y() + 4.0, 0.5);
    layout.advance(10.0);

    layout.gray(0.4);
    layout.text_centered(layout.y(), Font::Regular, SMALL_SIZE, DISCLAIMER);
    layout.gray(0.0);
    layout.advance(14.0);

    layout.text_centered(layout.y(), Font::Bold, 10.0, THANK_YOU);
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bizvoice_core::{BankDetails, Customer, InvoiceDraft};
    use chrono::{TimeZone, Utc};
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    fn item(name: &str, quantity: f64, rate_cents: i64) -> InvoiceItem {
        InvoiceItem {
            product_id: name.to_lowercase(),
            product_name: name.to_string(),
            description: Some(format!("{} description", name)),
            quantity,
            rate_cents,
            amount_cents: (quantity * rate_cents as f64).round() as i64,
        }
    }

    fn profile() -> BusinessProfile {
        BusinessProfile {
            company_name: "Sharma Traders".to_string(),
            gst_number: Some("27ABCDE1234F1Z5".to_string()),
            address_line1: Some("12 MG Road".to_string()),
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            state_code: Some("27".to_string()),
            pincode: Some("411001".to_string()),
            bank_name: Some("State Bank".to_string()),
            account_number: Some("0011223344".to_string()),
            ifsc_code: Some("SBIN0000001".to_string()),
            ..Default::default()
        }
    }

    fn invoice(items: Vec<InvoiceItem>, profile: Option<BusinessProfile>) -> Invoice {
        let draft = InvoiceDraft {
            customer: Customer {
                name: "Acme Corp".to_string(),
                email: Some("billing@acme.example".to_string()),
                phone: None,
                address: Some("4 Park Street".to_string()),
                city: Some("Kolkata".to_string()),
                state: None,
                pincode: None,
                gst_number: None,
            },
            items,
            tax_rate_bps: 1800,
            bank_details: None,
            notes: Some("Payment due within 30 days".to_string()),
            due_date: None,
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 10, 30, 0).unwrap();
        Invoice::assemble(draft, "INV-0042".to_string(), "alice", profile, now)
    }

    /// All text shown with Tj, per page.
    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn all_text(bytes: &[u8]) -> Vec<String> {
        page_texts(bytes).into_iter().flatten().collect()
    }

    #[test]
    fn test_long_address_keeps_contact_lines() {
        let mut inv = invoice(vec![item("Widget", 1.0, 10000)], Some(profile()));
        let address: Vec<String> = (1..=12).map(|n| format!("Address line {}", n)).collect();
        inv.customer.address = Some(address.join("\n"));
        inv.customer.phone = Some("+91 98765 43210".to_string());
        inv.customer.gst_number = Some("19AAACA1234B1Z2".to_string());

        let text = all_text(&render_invoice(&inv).unwrap());
        let has = |s: &str| text.iter().any(|t| t == s);

        assert!(has("Address line 1"));
        assert!(has("Address line 12"));
        assert!(has("Kolkata"));
        assert!(has("GSTIN: 19AAACA1234B1Z2"));
        assert!(has("Phone: +91 98765 43210"));
        assert!(has("Email: billing@acme.example"));
    }

    #[test]
    fn test_sections_present() {
        let inv = invoice(
            vec![item("Widget", 1.0, 10000), item("Gadget", 2.0, 10000)],
            Some(profile()),
        );
        let text = all_text(&render_invoice(&inv).unwrap());
        let has = |s: &str| text.iter().any(|t| t == s);

        assert!(has("Sharma Traders"));
        assert!(has("GSTIN: 27ABCDE1234F1Z5"));
        assert!(has("TAX INVOICE"));
        assert!(has("Invoice No: INV-0042"));
        assert!(has("Date: 17/03/2024"));
        assert!(has("Status: DRAFT"));
        assert!(has("State Code: 27"));
        assert!(has("Acme Corp"));
        assert!(has("Email: billing@acme.example"));
        assert!(has("Widget"));
        assert!(has("Widget description"));
        assert!(has("Rs. 200.00"));
        assert!(has("Rs. 300.00"));
        assert!(has("Rs. 354.00"));
        assert!(has("Payment due within 30 days"));
        assert!(has("Bank: State Bank"));
        assert!(has("IFSC: SBIN0000001"));
        assert!(has(DISCLAIMER));
        assert!(has(THANK_YOU));
        assert!(has("Page 1 of 1"));
    }

    #[test]
    fn test_tax_split_lines() {
        let inv = invoice(vec![item("Widget", 1.0, 10001)], Some(profile()));
        let text = all_text(&render_invoice(&inv).unwrap());

        // 18% of 100.01 is 18.0018, stored as 18.00; halves 9.00 + 9.00
        assert!(text.iter().any(|t| t == "CGST @ 9%"));
        assert!(text.iter().any(|t| t == "SGST @ 9%"));
        assert_eq!(text.iter().filter(|t| *t == "Rs. 9.00").count(), 2);
    }

    #[test]
    fn test_odd_paisa_goes_to_sgst() {
        // 18% of 0.05 rounds to 0.01: CGST 0.00, SGST 0.01
        let inv = invoice(vec![item("Pin", 1.0, 5)], None);
        let text = all_text(&render_invoice(&inv).unwrap());

        let cgst = text.iter().position(|t| t == "CGST @ 9%").unwrap();
        assert_eq!(text[cgst + 1], "Rs. 0.00");
        let sgst = text.iter().position(|t| t == "SGST @ 9%").unwrap();
        assert_eq!(text[sgst + 1], "Rs. 0.01");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let inv = invoice(vec![item("Widget", 1.5, 9999)], Some(profile()));
        assert_eq!(render_invoice(&inv).unwrap(), render_invoice(&inv).unwrap());
    }

    #[test]
    fn test_long_invoice_paginates_with_repeated_header() {
        let items = (1..=80).map(|i| item(&format!("Item {}", i), 1.0, 100)).collect();
        let bytes = render_invoice(&invoice(items, Some(profile()))).unwrap();
        let pages = page_texts(&bytes);

        assert!(pages.len() > 1);
        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            assert!(page.iter().any(|t| t == "Amount"), "page {} lacks table header", i + 1);
            assert!(page.contains(&format!("Page {} of {}", i + 1, total)));
        }
        assert!(pages.concat().iter().any(|t| t == "Item 80"));
    }

    #[test]
    fn test_bank_details_need_a_profile() {
        let mut inv = invoice(vec![item("Widget", 1.0, 100)], None);
        inv.bank_details = Some(BankDetails {
            bank_name: "HDFC".to_string(),
            account_number: "42".to_string(),
            ifsc_code: "HDFC0000042".to_string(),
            account_holder: String::new(),
        });
        let text = all_text(&render_invoice(&inv).unwrap());
        assert!(!text.iter().any(|t| t == "Bank Details:"));

        // Invoice-level details win over the profile's
        inv.business_profile = Some(profile());
        let text = all_text(&render_invoice(&inv).unwrap());
        assert!(text.iter().any(|t| t == "Bank: HDFC"));
        assert!(!text.iter().any(|t| t.starts_with("A/C Holder")));
    }

    #[test]
    fn test_blank_notes_omitted() {
        let mut inv = invoice(vec![item("Widget", 1.0, 100)], None);
        inv.notes = Some("   ".to_string());
        let text = all_text(&render_invoice(&inv).unwrap());
        assert!(!text.iter().any(|t| t == "Notes:"));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.125), "0.125");
        assert_eq!(format_percent(9.0), "9");
        assert_eq!(format_percent(2.5), "2.5");
    }
}
