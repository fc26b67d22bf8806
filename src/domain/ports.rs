use crate::config::ExtractConfig;
use crate::domain::model::{ConvertSummary, ExtractSummary, FetchedPage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` lives on disk, for reporting.
    fn describe(&self, path: &str) -> String;
}

pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<FetchedPage>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn extra_headers(&self) -> &BTreeMap<String, String>;
    fn extract_rules(&self) -> &ExtractConfig;
    fn output_dir(&self) -> &str;
    fn csv_file(&self) -> &str;
    fn json_file(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<FetchedPage>;
    async fn extract(&self, page: FetchedPage) -> Result<ExtractSummary>;
    async fn convert(&self) -> Result<ConvertSummary>;
}
