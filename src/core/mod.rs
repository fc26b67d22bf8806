pub mod convert;
pub mod etl;
pub mod extract;

pub use crate::domain::model::{BidRecord, ConvertSummary, ExtractSummary, FetchedPage, RunReport};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
