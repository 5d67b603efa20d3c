use crate::domain::model::QueryParams;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://data.cityofchicago.org/resource/mft5-nfa8.json";
pub const DEFAULT_DATE_FIELD: &str = "complaint_date";
pub const DEFAULT_LIMIT: u64 = 100_000;

/// The single GET issued per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: Url,
}

impl RequestDescriptor {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Appends `params` to `endpoint` as form-encoded query pairs. Empty params yield a bare URL.
pub fn build_request(endpoint: &str, params: &QueryParams) -> Result<RequestDescriptor> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: "endpoint".to_string(),
        });
    }

    let mut url = Url::parse(endpoint)?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params.iter() {
            pairs.append_pair(key, &value.to_string());
        }
    }

    Ok(RequestDescriptor { url })
}

/// SoQL predicate covering whole days from `from` through `to`.
pub fn date_range_clause(field: &str, from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "{} between '{}T00:00:00' and '{}T23:59:59'",
        field,
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}

/// The 2013-2022 complaint window with a 100k row cap.
pub fn default_params() -> QueryParams {
    let from = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap_or_default();
    let to = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default();
    QueryParams::new()
        .with("$where", date_range_clause(DEFAULT_DATE_FIELD, from, to))
        .with("$limit", DEFAULT_LIMIT)
}
