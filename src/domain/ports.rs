use crate::utils::progress::Progress;
use crate::domain::model::{QueryParams, Record, ResultTable};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// Reads a stored file back. The pipeline only writes; this is for callers inspecting output.
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Replaces the whole file; a failed write leaves any previous file intact.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn query_params(&self) -> QueryParams;
    fn output_path(&self) -> &str;

    /// `None` keeps the HTTP client's default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    fn dataset_name(&self) -> &str {
        "COPA cases"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<ResultTable>;
    async fn load(&self, table: ResultTable) -> Result<String>;

    /// Where the run's progress lines go.
    fn progress(&self) -> &Progress;
}
