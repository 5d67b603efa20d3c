use copa_etl::domain::ports::Storage;
use copa_etl::{
    CapturedOutput, CliConfig, CopaPipeline, EtlEngine, EtlError, LocalStorage, TomlConfig,
};
use httpmock::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const OUTPUT: &str = "data/API/raw/copa_cases.csv";

fn cli_config(endpoint: String) -> CliConfig {
    CliConfig {
        endpoint,
        output: OUTPUT.to_string(),
        ..CliConfig::default()
    }
}

fn engine(dir: &Path, config: CliConfig) -> EtlEngine<CopaPipeline<LocalStorage, CliConfig>> {
    let pipeline = CopaPipeline::new(LocalStorage::new(dir), config).unwrap();
    EtlEngine::new(pipeline)
}

fn captured_engine(
    dir: &Path,
    config: CliConfig,
) -> (EtlEngine<CopaPipeline<LocalStorage, CliConfig>>, CapturedOutput) {
    let output = CapturedOutput::new();
    let pipeline = CopaPipeline::new(LocalStorage::new(dir), config)
        .unwrap()
        .with_progress(output.progress());
    (EtlEngine::new(pipeline), output)
}

#[tokio::test]
async fn test_end_to_end_writes_union_of_fields() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/resource/mft5-nfa8.json")
            .query_param("$limit", "100000")
            .query_param_exists("$where");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"[{"id":"1","type":"A"},{"id":"2","type":"B","note":"x"}]"#);
    });

    let summary = engine(
        temp_dir.path(),
        cli_config(server.url("/resource/mft5-nfa8.json")),
    )
    .run()
    .await
    .unwrap();

    api_mock.assert_hits(1);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.columns, 3);
    assert_eq!(summary.output_path, OUTPUT);

    let csv = std::fs::read_to_string(temp_dir.path().join(OUTPUT)).unwrap();
    assert_eq!(csv, "id,type,note\n1,A,\n2,B,x\n");
}

#[tokio::test]
async fn test_row_count_matches_response_length() {
    let temp_dir = TempDir::new().unwrap();

    let records: Vec<serde_json::Value> = (0..250)
        .map(|i| {
            if i % 3 == 0 {
                serde_json::json!({"log_no": i.to_string(), "race_of_complainants": "Black | White"})
            } else {
                serde_json::json!({"log_no": i.to_string(), "beat": format!("{:04}", i), "current_status": null})
            }
        })
        .collect();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cases.json");
        then.status(200).json_body(serde_json::Value::Array(records));
    });

    let summary = engine(temp_dir.path(), cli_config(server.url("/cases.json")))
        .run()
        .await
        .unwrap();

    let mut reader = csv::Reader::from_path(temp_dir.path().join(OUTPUT)).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec!["log_no", "race_of_complainants", "beat", "current_status"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 250);
    assert_eq!(summary.rows, 250);
    assert_eq!(&rows[1][2], "0001");
    assert_eq!(&rows[1][3], "");
    assert_eq!(&rows[3][1], "Black | White");
}

#[tokio::test]
async fn test_not_found_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/resource/gone.json");
        then.status(404).body("Not Found");
    });

    let result = engine(temp_dir.path(), cli_config(server.url("/resource/gone.json")))
        .run()
        .await;

    api_mock.assert_hits(1);
    let err = result.unwrap_err();
    assert!(matches!(err, EtlError::HttpError { status: 404, .. }));
    let message = err.to_string();
    assert!(message.contains("404"));
    assert!(message.contains("Not Found"));
    assert!(!temp_dir.path().join(OUTPUT).exists());
}

#[tokio::test]
async fn test_failure_keeps_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join(OUTPUT);
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    std::fs::write(&output, "id\nprevious\n").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/flaky.json");
        then.status(503).body("Service Unavailable");
    });

    let err = engine(temp_dir.path(), cli_config(server.url("/flaky.json")))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::HttpError { status: 503, .. }));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "id\nprevious\n");
}

#[tokio::test]
async fn test_malformed_body_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/error.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"code":"query.compiler.malformed","error":true}"#);
    });

    let err = engine(temp_dir.path(), cli_config(server.url("/error.json")))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::MalformedResponse { .. }));
    assert!(!temp_dir.path().join(OUTPUT).exists());
}

#[tokio::test]
async fn test_empty_array_writes_empty_file() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/empty.json");
        then.status(200).body("[]");
    });

    let summary = engine(temp_dir.path(), cli_config(server.url("/empty.json")))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.columns, 0);
    let bytes = std::fs::read(temp_dir.path().join(OUTPUT)).unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/stable.json");
        then.status(200).json_body(serde_json::json!([
            {"log_no": "2022-0001", "complaint_date": "2022-01-03T10:15:00.000", "location": {"latitude": "41.88"}},
            {"log_no": "2022-0002", "complaint_date": "2022-01-04T08:00:00.000", "beat": "1834"}
        ]));
    });

    let output = temp_dir.path().join(OUTPUT);

    engine(temp_dir.path(), cli_config(server.url("/stable.json")))
        .run()
        .await
        .unwrap();
    let first = std::fs::read(&output).unwrap();

    engine(temp_dir.path(), cli_config(server.url("/stable.json")))
        .run()
        .await
        .unwrap();
    let second = std::fs::read(&output).unwrap();

    api_mock.assert_hits(2);
    assert_eq!(first, second);
    assert!(String::from_utf8(first)
        .unwrap()
        .contains(r#""{""latitude"":""41.88""}""#));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let temp_dir = TempDir::new().unwrap();

    let err = engine(
        temp_dir.path(),
        cli_config("http://127.0.0.1:1/resource/mft5-nfa8.json".to_string()),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, EtlError::NetworkError(_)));
    assert!(!temp_dir.path().join(OUTPUT).exists());
}

#[tokio::test]
async fn test_toml_config_drives_the_run() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/resource/mft5-nfa8.json")
            .query_param("$limit", "5")
            .query_param("$order", "log_no");
        then.status(200)
            .json_body(serde_json::json!([{"log_no": "1"}, {"log_no": "2"}]));
    });

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[source]
endpoint = "{}"

[source.parameters]
"$limit" = 5
"$order" = "log_no"

[load]
output_path = "exports/cases.csv"
"#,
        server.url("/resource/mft5-nfa8.json")
    ))
    .unwrap();

    let pipeline = CopaPipeline::new(LocalStorage::new(temp_dir.path()), config).unwrap();
    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    api_mock.assert();
    assert_eq!(summary.output_path, "exports/cases.csv");
    let csv = std::fs::read_to_string(temp_dir.path().join("exports/cases.csv")).unwrap();
    assert_eq!(csv, "log_no\n1\n2\n");
}

#[tokio::test]
async fn test_progress_lines_on_success() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/resource/mft5-nfa8.json");
        then.status(200)
            .body(r#"[{"id":"1","type":"A"},{"id":"2","type":"B","note":"x"}]"#);
    });

    let (engine, output) =
        captured_engine(temp_dir.path(), cli_config(server.url("/resource/mft5-nfa8.json")));
    engine.run().await.unwrap();

    assert_eq!(
        output.contents(),
        format!(
            "Fetching COPA cases data...\n\
             Status code: 200\n\
             Downloaded 2 records (3 columns)\n\
             Output saved to: {}\n",
            OUTPUT
        )
    );

    let storage = LocalStorage::new(temp_dir.path());
    let written = storage.read_file(OUTPUT).await.unwrap();
    assert_eq!(written, b"id,type,note\n1,A,\n2,B,x\n");
}

#[tokio::test]
async fn test_progress_lines_on_http_error() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/resource/gone.json");
        then.status(404).body("Not Found");
    });

    let (engine, output) =
        captured_engine(temp_dir.path(), cli_config(server.url("/resource/gone.json")));
    engine.run().await.unwrap_err();

    assert_eq!(
        output.contents(),
        "Fetching COPA cases data...\nStatus code: 404\nError: 404: Not Found\n"
    );

    let storage = LocalStorage::new(temp_dir.path());
    assert!(storage.read_file(OUTPUT).await.is_err());
}
