use crate::adapters::http::HttpClient;
use crate::core::csv_export::to_csv_bytes;
use crate::core::request::build_request;
use crate::core::response::interpret;
use crate::core::table::tabulate;
use crate::core::{ConfigProvider, Pipeline, Record, ResultTable, Storage};
use crate::utils::error::Result;
use crate::utils::progress::Progress;

/// Fetches one dataset snapshot and writes it as a single CSV file.
pub struct CopaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    http: HttpClient,
    progress: Progress,
}

impl<S: Storage, C: ConfigProvider> CopaPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let http = HttpClient::new(config.timeout())?;
        Ok(Self {
            storage,
            config,
            http,
            progress: Progress::stdout(),
        })
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CopaPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let request = build_request(self.config.endpoint(), &self.config.query_params())?;

        self.progress
            .line(format_args!("Fetching {} data...", self.config.dataset_name()));
        let response = self.http.get(&request).await?;
        self.progress
            .line(format_args!("Status code: {}", response.status));

        interpret(response)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<ResultTable> {
        let table = tabulate(&data);
        tracing::debug!(
            "Tabulated {} records into {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    async fn load(&self, table: ResultTable) -> Result<String> {
        let output_path = self.config.output_path();
        let bytes = to_csv_bytes(&table)?;

        tracing::debug!("Writing CSV file ({} bytes) to storage", bytes.len());
        self.storage.write_file(output_path, &bytes).await?;

        Ok(output_path.to_string())
    }

    fn progress(&self) -> &Progress {
        &self.progress
    }
}
