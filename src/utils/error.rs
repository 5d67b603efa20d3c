use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Http,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::NetworkError(_) => ErrorCategory::Network,
            EtlError::HttpError { .. } => ErrorCategory::Http,
            EtlError::MalformedResponse { .. } | EtlError::CsvError(_) => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::UrlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Transient failures are `Medium`: re-running later may succeed.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::NetworkError(_) => ErrorSeverity::Medium,
            EtlError::HttpError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            EtlError::HttpError { .. } => ErrorSeverity::High,
            EtlError::MalformedResponse { .. } => ErrorSeverity::High,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::UrlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::NetworkError(e) if e.is_timeout() => {
                "The request timed out; try again later or raise --timeout-secs".to_string()
            }
            EtlError::NetworkError(_) => {
                "Check your network connection and that the endpoint host is reachable".to_string()
            }
            EtlError::HttpError { status, .. } => match *status {
                400 => "The API rejected the query; check the $where clause and other parameters"
                    .to_string(),
                401 | 403 => "The dataset refused access; it may have been made private".to_string(),
                404 => "Check the endpoint URL and dataset identifier".to_string(),
                429 => "The API is throttling requests; wait before running again".to_string(),
                s if s >= 500 => "The open-data portal is having trouble; try again later".to_string(),
                _ => "Inspect the response body above for details".to_string(),
            },
            EtlError::MalformedResponse { .. } => {
                "The endpoint did not return a JSON array of records; make sure it is a .json resource URL"
                    .to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output path is writable and the disk is not full".to_string()
            }
            EtlError::UrlError(_) => "Use a full URL such as https://host/resource/id.json".to_string(),
            EtlError::ConfigError { .. } => "Fix the configuration file syntax".to_string(),
            EtlError::MissingConfigError { field } => format!("Provide a value for '{}'", field),
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::NetworkError(_) => format!("Could not reach the API: {}", self),
            EtlError::HttpError { status, .. } => {
                format!("The API answered with status {}", status)
            }
            EtlError::MalformedResponse { message } => {
                format!("The API response could not be read: {}", message)
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                format!("Writing the CSV file failed: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
