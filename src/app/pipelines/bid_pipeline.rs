use crate::core::convert::csv_to_json;
use crate::core::extract::{extract_listings, write_csv};
use crate::core::{ConfigProvider, PageFetcher, Pipeline, Storage};
use crate::domain::model::{ConvertSummary, ExtractSummary, FetchedPage};
use crate::utils::error::{EtlError, Result};

/// Listing page -> CSV hand-off file -> JSON file.
pub struct BidPipeline<S: Storage, C: ConfigProvider, F: PageFetcher> {
    storage: S,
    config: C,
    fetcher: F,
}

impl<S: Storage, C: ConfigProvider, F: PageFetcher> BidPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: PageFetcher> Pipeline for BidPipeline<S, C, F> {
    async fn fetch(&self) -> Result<FetchedPage> {
        self.fetcher.fetch(self.config.source_url()).await
    }

    async fn extract(&self, page: FetchedPage) -> Result<ExtractSummary> {
        let rules = self.config.extract_rules();
        let records = extract_listings(&page.body, rules)?.ok_or_else(|| {
            EtlError::ContainerNotFound {
                selector: rules.container_selector.clone(),
            }
        })?;
        tracing::debug!("Found {} listings", records.len());

        let csv_data = write_csv(&records)?;
        let csv_file = self.config.csv_file();
        self.storage.write_file(csv_file, &csv_data).await?;

        Ok(ExtractSummary {
            csv_path: self.storage.describe(csv_file),
            rows: records.len(),
        })
    }

    async fn convert(&self) -> Result<ConvertSummary> {
        let csv_file = self.config.csv_file();
        let csv_data = match self.storage.read_file(csv_file).await {
            Ok(data) => data,
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EtlError::MissingInput {
                    path: self.storage.describe(csv_file),
                });
            }
            Err(e) => return Err(e),
        };

        let (json_data, rows) = csv_to_json(&csv_data)?;
        let json_file = self.config.json_file();
        tracing::debug!("Writing {} bytes of JSON", json_data.len());
        self.storage.write_file(json_file, &json_data).await?;

        Ok(ConvertSummary {
            json_path: self.storage.describe(json_file),
            rows,
        })
    }
}
