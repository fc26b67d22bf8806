use serde::{Deserialize, Serialize};

/// Column names of the hand-off CSV, in output order.
pub const CSV_HEADER: [&str; 3] = ["Bid Number", "Title", "Link"];

/// One listing scraped from the bid page. Missing parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    #[serde(rename = "Bid Number")]
    pub bid_number: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub csv_path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub json_path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rows: usize,
    pub csv_path: String,
    pub json_path: String,
}
