use crate::config::DEFAULT_OUTPUT_PATH;
use crate::core::request::{date_range_clause, DEFAULT_DATE_FIELD, DEFAULT_ENDPOINT, DEFAULT_LIMIT};
use crate::core::{ConfigProvider, QueryParams};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_ordered, validate_path, validate_positive_number,
    validate_url, Validate,
};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Running with no arguments fetches 2013-2022 complaints into `data/API/raw/copa_cases.csv`.
#[derive(Debug, Clone, Parser)]
#[command(name = "copa-etl")]
#[command(about = "Download COPA complaint records from the Chicago Data Portal into a CSV file")]
pub struct CliConfig {
    /// Socrata resource URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Field the date range filters on
    #[arg(long, default_value = DEFAULT_DATE_FIELD)]
    pub date_field: String,

    /// First day of the date range (inclusive)
    #[arg(long, default_value = "2013-01-01")]
    pub from: NaiveDate,

    /// Last day of the date range (inclusive)
    #[arg(long, default_value = "2022-12-31")]
    pub to: NaiveDate,

    /// Raw $where clause, replaces the date range
    #[arg(long = "where", conflicts_with = "no_filter")]
    pub where_clause: Option<String>,

    /// Send no $where clause at all
    #[arg(long)]
    pub no_filter: bool,

    /// Row cap sent as $limit
    #[arg(long, default_value_t = DEFAULT_LIMIT, conflicts_with = "no_limit")]
    pub limit: u64,

    /// Send no $limit; the server default applies
    #[arg(long)]
    pub no_limit: bool,

    /// Extra query parameter as KEY=VALUE, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub extra_params: Vec<(String, String)>,

    /// CSV file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    /// Request timeout in seconds; the client default applies when unset
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Read endpoint, parameters and output path from a TOML file instead
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::parse_from(["copa-etl"])
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if !self.no_filter {
            let clause = self
                .where_clause
                .clone()
                .unwrap_or_else(|| date_range_clause(&self.date_field, self.from, self.to));
            params.push("$where", clause);
        }
        if !self.no_limit {
            params.push("$limit", self.limit);
        }
        for (key, value) in &self.extra_params {
            params.push(key.clone(), value.clone());
        }
        params
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_path("output", &self.output)?;

        if !self.no_filter {
            match &self.where_clause {
                Some(clause) => validate_non_empty_string("where", clause)?,
                None => {
                    validate_non_empty_string("date_field", &self.date_field)?;
                    validate_ordered("from/to", &self.from, &self.to)?;
                }
            }
        }

        if !self.no_limit {
            validate_positive_number("limit", self.limit, 1)?;
        }

        if let Some(secs) = self.timeout_secs {
            validate_positive_number("timeout_secs", secs, 1)?;
        }

        Ok(())
    }
}
