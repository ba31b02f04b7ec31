//! Analyze command handler.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use scanbrief::analysis::{AnalysisRequest, Analyzer};
use scanbrief::error::AnalysisError;
use scanbrief::config::Config;

/// Analyze a file (or stdin) and print the summary.
pub(crate) async fn cmd_analyze(
    config: Config,
    file: Option<PathBuf>,
    model: Option<String>,
    json: bool,
) -> Result<()> {
    let raw = read_input(file.as_deref())?;
    let Some(data) = parse_input(&raw) else {
        bail!("No data provided. Pipe scan data on stdin or pass a file path.");
    };

    let analyzer = Analyzer::from_config(&config).context("Failed to build analyzer")?;
    let request = AnalysisRequest { data, model };
    let report = analyzer.analyze(request).await.map_err(with_provider_detail)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.truncated {
        eprintln!("warning: input exceeded the provider limit and was truncated");
    }
    println!("{}", report.summary);
    eprintln!(
        "\n[{} via {} | {} record(s) | {}]",
        report.model_key,
        report.wire_name,
        report.metadata.record_count,
        report.metadata.processed_at
    );

    Ok(())
}

/// Keep the provider's wording as the cause so `Caused by:` shows it.
fn with_provider_detail(err: AnalysisError) -> anyhow::Error {
    match err.detail {
        Some(detail) if !err.message.contains(&detail) => {
            anyhow!("provider said: {}", detail).context(err.message)
        }
        _ => anyhow!(err.message),
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// JSON input is sent as structured data; anything else as text.
/// Returns `None` for blank input or a bare JSON `null`.
fn parse_input(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_input_json() {
        assert_eq!(
            parse_input(r#"[{"ip": "192.0.2.1"}]"#),
            Some(json!([{"ip": "192.0.2.1"}]))
        );
    }

    #[test]
    fn test_parse_input_text() {
        let raw = "192.0.2.1 22/tcp open ssh\n";
        assert_eq!(parse_input(raw), Some(Value::String(raw.to_string())));
    }

    #[test]
    fn test_parse_input_blank_or_null() {
        assert_eq!(parse_input("   \n"), None);
        assert_eq!(parse_input("null"), None);
    }

    #[test]
    fn test_provider_detail_kept_as_cause() {
        use scanbrief::analysis::translate::ErrorContext;
        use scanbrief::error::ErrorKind;

        let err = AnalysisError::new(
            ErrorKind::ModelNotFound,
            &ErrorContext {
                wire_name: Some("gpt-4o"),
                provider_message: Some("The model `gpt-4o` does not exist"),
                ..Default::default()
            },
        );
        let rendered = format!("{:#}", with_provider_detail(err));
        assert!(rendered.starts_with("Model \"gpt-4o\" not found"));
        assert!(rendered.ends_with("provider said: The model `gpt-4o` does not exist"));
    }

    #[test]
    fn test_detail_not_repeated_when_in_message() {
        use scanbrief::analysis::translate::ErrorContext;
        use scanbrief::error::ErrorKind;

        let err = AnalysisError::new(
            ErrorKind::NetworkError,
            &ErrorContext {
                provider_message: Some("connection refused"),
                ..Default::default()
            },
        );
        let rendered = format!("{:#}", with_provider_detail(err));
        assert_eq!(rendered, "Network error: connection refused");
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "{}");
    }
}
