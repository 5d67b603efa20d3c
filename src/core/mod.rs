pub mod csv_export;
pub mod etl;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod table;

pub use crate::domain::model::{QueryParams, Record, ResultTable};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
