//! HTML listing extraction and the CSV hand-off encoding.

use crate::config::ExtractConfig;
use crate::domain::model::{BidRecord, CSV_HEADER};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::parse_selector;
use csv::{Terminator, WriterBuilder};
use scraper::{ElementRef, Html, Selector};

/// Pulls one [`BidRecord`] per direct `item_tag` child of the container.
///
/// Returns `Ok(None)` when no element matches `container_selector`, and
/// `Ok(Some(vec![]))` when the container exists but holds no listings.
pub fn extract_listings(html: &str, rules: &ExtractConfig) -> Result<Option<Vec<BidRecord>>> {
    let container_selector = parse_selector("extract.container_selector", &rules.container_selector)?;
    let bid_number_selector =
        parse_selector("extract.bid_number_selector", &rules.bid_number_selector)?;
    let link_selector = parse_selector("extract.link_selector", &rules.link_selector)?;

    let document = Html::parse_document(html);
    let Some(container) = document.select(&container_selector).next() else {
        return Ok(None);
    };

    let records = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name().eq_ignore_ascii_case(&rules.item_tag))
        .map(|item| parse_listing(item, &bid_number_selector, &link_selector))
        .collect();

    Ok(Some(records))
}

fn parse_listing(item: ElementRef<'_>, bid_number: &Selector, link: &Selector) -> BidRecord {
    let anchor = item.select(link).next();

    BidRecord {
        bid_number: item
            .select(bid_number)
            .next()
            .map(trimmed_text)
            .unwrap_or_default(),
        title: anchor.map(trimmed_text).unwrap_or_default(),
        link: anchor
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_default(),
    }
}

/// Each text node is trimmed on its own and the non-empty pieces are joined with nothing,
/// so `Track <b>Work</b>` reads as `TrackWork`.
fn trimmed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Encodes records as CSV with the fixed header, which is written even for zero records.
pub fn write_csv(records: &[BidRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([&record.bid_number, &record.title, &record.link])?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
