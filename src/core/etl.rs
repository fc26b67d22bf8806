use crate::core::Pipeline;
use crate::domain::model::{ConvertSummary, RunReport};
use crate::utils::error::{EtlError, Result};

/// Runs the three stages in order. A stage only runs once the one before it succeeded.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Fetching listing page...");
        let page = self.pipeline.fetch().await?;
        if !page.is_success() {
            tracing::debug!("{} answered with status {}", page.url, page.status);
            return Err(EtlError::HttpStatus {
                status: page.status,
                url: page.url,
            });
        }
        tracing::debug!("Fetched {} bytes", page.body.len());

        tracing::info!("Extracting listings...");
        let extracted = self.pipeline.extract(page).await?;
        tracing::info!("Wrote {} listings to {}", extracted.rows, extracted.csv_path);

        let converted = self.convert_only().await?;

        Ok(RunReport {
            rows: extracted.rows,
            csv_path: extracted.csv_path,
            json_path: converted.json_path,
        })
    }

    /// Converter stage alone, against whatever CSV hand-off file is already on disk.
    pub async fn convert_only(&self) -> Result<ConvertSummary> {
        tracing::info!("Converting CSV to JSON...");
        let converted = self.pipeline.convert().await?;
        tracing::info!("Wrote {} rows to {}", converted.rows, converted.json_path);
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ExtractSummary, FetchedPage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        status: u16,
        container_found: bool,
        extract_calls: AtomicUsize,
        convert_calls: AtomicUsize,
    }

    impl StubPipeline {
        fn new(status: u16, container_found: bool) -> Self {
            Self {
                status,
                container_found,
                extract_calls: AtomicUsize::new(0),
                convert_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn fetch(&self) -> Result<FetchedPage> {
            Ok(FetchedPage {
                url: "https://example.com/bids".to_string(),
                status: self.status,
                body: String::new(),
            })
        }

        async fn extract(&self, _page: FetchedPage) -> Result<ExtractSummary> {
            self.extract_calls.fetch_add(1, Ordering::SeqCst);
            if !self.container_found {
                return Err(EtlError::ContainerNotFound {
                    selector: "ul#filterList".to_string(),
                });
            }
            Ok(ExtractSummary {
                csv_path: "out.csv".to_string(),
                rows: 2,
            })
        }

        async fn convert(&self) -> Result<ConvertSummary> {
            self.convert_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ConvertSummary {
                json_path: "out.json".to_string(),
                rows: 2,
            })
        }
    }

    #[tokio::test]
    async fn test_all_stages_run_on_success() {
        let engine = EtlEngine::new(StubPipeline::new(200, true));

        let report = engine.run().await.unwrap();

        assert_eq!(
            report,
            RunReport {
                rows: 2,
                csv_path: "out.csv".to_string(),
                json_path: "out.json".to_string(),
            }
        );
        assert_eq!(engine.pipeline.extract_calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.pipeline.convert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bad_status_stops_before_extract() {
        let engine = EtlEngine::new(StubPipeline::new(503, true));

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::HttpStatus { status: 503, .. }));
        assert_eq!(engine.pipeline.extract_calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.pipeline.convert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_container_skips_convert() {
        let engine = EtlEngine::new(StubPipeline::new(200, false));

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::ContainerNotFound { .. }));
        assert_eq!(engine.pipeline.extract_calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.pipeline.convert_calls.load(Ordering::SeqCst), 0);
    }
}
