pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{HttpClient, LocalStorage};
pub use core::{
    etl::{EtlEngine, RunSummary},
    pipeline::CopaPipeline,
};
pub use domain::model::{ParamValue, QueryParams, RawResponse, Record, ResultTable};
pub use utils::error::{EtlError, Result};
pub use utils::progress::{CapturedOutput, Progress};
