// Adapters layer: concrete implementations for external systems (http, storage).

pub mod http;
pub mod storage;

pub use http::HttpClient;
pub use storage::LocalStorage;
