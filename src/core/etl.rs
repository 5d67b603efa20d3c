use crate::core::Pipeline;
use crate::utils::error::{EtlError, Result};
use std::time::Instant;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub rows: usize,
    pub columns: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform, load. Nothing is written unless extraction succeeds.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let progress = self.pipeline.progress();

        let records = self.pipeline.extract().await.inspect_err(|e| {
            if let EtlError::HttpError { status, body } = e {
                progress.line(format_args!("Error: {}: {}", status, body));
            }
        })?;
        tracing::info!("Extracted {} records", records.len());

        let table = self.pipeline.transform(records).await?;
        let (rows, columns) = (table.row_count(), table.column_count());

        let output_path = self.pipeline.load(table).await?;
        progress.line(format_args!("Downloaded {} records ({} columns)", rows, columns));
        progress.line(format_args!("Output saved to: {}", output_path));

        tracing::info!("Run finished in {:?}", started.elapsed());
        Ok(RunSummary {
            output_path,
            rows,
            columns,
        })
    }
}
