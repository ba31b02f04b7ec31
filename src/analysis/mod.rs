//! Analysis orchestration.
//!
//! [`Analyzer::analyze`] runs one request through the adapter: resolve the
//! model, look up the family credential, build the prompt, normalize the
//! payload and make the single provider call. Every failure comes back as an
//! [`AnalysisError`].

pub mod prompt;
pub mod translate;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};

use crate::config::Config;
use crate::error::{AnalysisError, ErrorKind, Result};
use crate::providers::{
    family_spec, normalize, HttpInvoker, LogicalModel, ModelCatalog, ProviderFamily,
    ProviderInvoker, RequestPolicy, FAMILY_REGISTRY,
};

use self::translate::ErrorContext;

// ============================================================================
// Request / Report
// ============================================================================

/// One analysis request: arbitrary scan data plus an optional model key.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub data: Value,
    pub model: Option<String>,
}

impl AnalysisRequest {
    pub fn new(data: Value) -> Self {
        Self { data, model: None }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Shape information about the submitted data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    /// `string`, `number`, `boolean` or `object` (arrays and null included)
    pub data_type: &'static str,
    /// Array length, or 1 for anything else
    pub record_count: usize,
    pub processed_at: String,
}

impl AnalysisMetadata {
    pub fn describe(data: &Value, processed_at: DateTime<Utc>) -> Self {
        Self {
            data_type: data_type(data),
            record_count: record_count(data),
            processed_at: processed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Successful analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub model_key: String,
    pub wire_name: String,
    pub truncated: bool,
    pub metadata: AnalysisMetadata,
}

fn data_type(data: &Value) -> &'static str {
    match data {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Array(_) | Value::Object(_) | Value::Null => "object",
    }
}

fn record_count(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

// ============================================================================
// Analyzer
// ============================================================================

#[derive(Debug, Clone)]
struct FamilySettings {
    credential: Option<SecretString>,
    max_input_chars: usize,
}

impl FamilySettings {
    fn from_config(config: &Config, family: ProviderFamily) -> Self {
        Self {
            credential: config.credential(family).cloned(),
            max_input_chars: config.max_input_chars(family),
        }
    }
}

/// Runs analysis requests. Read-only after construction; share it behind an `Arc`.
pub struct Analyzer {
    catalog: ModelCatalog,
    policy: RequestPolicy,
    families: HashMap<ProviderFamily, FamilySettings>,
    invoker: Arc<dyn ProviderInvoker>,
}

impl Analyzer {
    /// Build an analyzer that talks HTTP to the configured endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let invoker = HttpInvoker::new(config.endpoints())?;
        Self::with_invoker(config, Arc::new(invoker))
    }

    /// Build an analyzer around an arbitrary invoker.
    pub fn with_invoker(config: &Config, invoker: Arc<dyn ProviderInvoker>) -> Result<Self> {
        Ok(Self {
            catalog: ModelCatalog::new(&config.analysis.default_model)?,
            policy: config.request_policy(),
            families: FAMILY_REGISTRY
                .iter()
                .map(|spec| (spec.family, FamilySettings::from_config(config, spec.family)))
                .collect(),
            invoker,
        })
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Analyze one request.
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> std::result::Result<AnalysisReport, AnalysisError> {
        let request_id = uuid::Uuid::new_v4();
        let span = info_span!(
            "analysis",
            request_id = %request_id,
            model = request.model.as_deref().unwrap_or("default"),
        );

        async {
            let start = Instant::now();
            let result = self.run(&request).await;
            let latency_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(report) => info!(
                    latency_ms,
                    model = %report.model_key,
                    summary_len = report.summary.len(),
                    truncated = report.truncated,
                    "Analysis completed"
                ),
                Err(e) => warn!(latency_ms, kind = %e.kind, error = %e, "Analysis failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<AnalysisReport, AnalysisError> {
        let model = self.catalog.resolve(request.model.as_deref())?;
        let spec = family_spec(model.family);
        let settings = self.families.get(&model.family);

        let credential = settings
            .and_then(|s| s.credential.as_ref())
            .ok_or_else(|| missing_credential(model))?;
        let max_input_chars = settings
            .map(|s| s.max_input_chars)
            .unwrap_or(spec.default_max_input_chars);

        let prompt = prompt::build(&request.data, spec.template, max_input_chars)?;
        if prompt.truncated {
            warn!(
                limit = max_input_chars,
                "Input data truncated to fit the provider limit"
            );
        }

        let payload = normalize(&prompt, model, &self.policy);
        let summary = self.invoker.invoke(&payload, credential).await?;

        Ok(AnalysisReport {
            summary,
            model_key: model.key.to_string(),
            wire_name: model.wire_name.to_string(),
            truncated: prompt.truncated,
            metadata: AnalysisMetadata::describe(&request.data, Utc::now()),
        })
    }
}

fn missing_credential(model: &LogicalModel) -> AnalysisError {
    let spec = family_spec(model.family);
    AnalysisError::new(
        ErrorKind::MissingCredential,
        &ErrorContext {
            model_key: Some(model.key),
            wire_name: Some(model.wire_name),
            provider: Some(spec.display_name),
            credential_env: Some(spec.credential_env),
            ..Default::default()
        },
    )
}
