//! Configuration validation with unknown field detection.

use serde_json::Value;
use std::collections::HashSet;

use crate::config::Config;
use crate::providers::{ModelCatalog, FAMILY_REGISTRY};

/// Known top-level config field names.
const KNOWN_TOP_LEVEL: &[&str] = &["providers", "analysis", "gateway", "logging"];

const KNOWN_PROVIDER: &[&str] = &["api_key", "api_base", "max_input_chars"];

const KNOWN_ANALYSIS: &[&str] = &[
    "default_model",
    "temperature",
    "top_p",
    "max_tokens",
    "max_completion_tokens",
    "timeout_secs",
    "reasoning_timeout_secs",
];

const KNOWN_GATEWAY: &[&str] = &["host", "port"];

const KNOWN_LOGGING: &[&str] = &["format", "level", "file"];

/// A validation diagnostic.
#[derive(Debug)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub path: String,
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub enum DiagnosticLevel {
    Ok,
    Warn,
    Error,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            DiagnosticLevel::Ok => "[OK]",
            DiagnosticLevel::Warn => "[WARN]",
            DiagnosticLevel::Error => "[ERROR]",
        };
        if self.path.is_empty() {
            write!(f, "{} {}", prefix, self.message)
        } else {
            write!(f, "{} {}: {}", prefix, self.path, self.message)
        }
    }
}

/// Simple Levenshtein distance for "did you mean?" suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        prev = row;
    }
    prev[b.len()]
}

/// Suggest the closest known field name (if distance <= 3).
pub fn suggest_field(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by_key(|(_, d)| *d)
        .map(|(k, _)| format!("did you mean '{}'?", k))
}

/// Report keys of `obj` that are not in `known`. Returns true if any were found.
fn check_keys(
    obj: &serde_json::Map<String, Value>,
    prefix: &str,
    known: &[&str],
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let known_set: HashSet<&str> = known.iter().copied().collect();
    let mut has_unknown = false;
    for key in obj.keys() {
        if known_set.contains(key.as_str()) {
            continue;
        }
        has_unknown = true;
        let msg = match suggest_field(key, known) {
            Some(suggestion) => format!("Unknown field '{}' ({})", key, suggestion),
            None => format!("Unknown field '{}'", key),
        };
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        diagnostics.push(Diagnostic::new(DiagnosticLevel::Warn, path, msg));
    }
    has_unknown
}

/// Validate a raw JSON config value against known field names.
///
/// Unknown fields are ignored at load time, so they surface as warnings here.
pub fn validate_config(raw: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let Some(obj) = raw.as_object() else {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "",
            "Config must be a JSON object",
        ));
        return diagnostics;
    };

    diagnostics.push(Diagnostic::new(DiagnosticLevel::Ok, "", "Valid JSON"));

    let mut has_unknown = check_keys(obj, "", KNOWN_TOP_LEVEL, &mut diagnostics);

    if let Some(providers) = obj.get("providers").and_then(Value::as_object) {
        let families: Vec<&str> = FAMILY_REGISTRY.iter().map(|f| f.family.id()).collect();
        has_unknown |= check_keys(providers, "providers", &families, &mut diagnostics);
        for family in &families {
            if let Some(section) = providers.get(*family).and_then(Value::as_object) {
                let prefix = format!("providers.{}", family);
                has_unknown |= check_keys(section, &prefix, KNOWN_PROVIDER, &mut diagnostics);
            }
        }
    }

    for (name, known) in [
        ("analysis", KNOWN_ANALYSIS),
        ("gateway", KNOWN_GATEWAY),
        ("logging", KNOWN_LOGGING),
    ] {
        if let Some(section) = obj.get(name).and_then(Value::as_object) {
            has_unknown |= check_keys(section, name, known, &mut diagnostics);
        }
    }

    if !has_unknown {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Ok,
            "",
            "All fields recognized",
        ));
    }

    diagnostics
}

/// Check a loaded config (file plus environment) for values that would
/// fail at request time.
pub fn validate_settings(config: &Config) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Err(e) = ModelCatalog::new(&config.analysis.default_model) {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "analysis.default_model",
            e.to_string(),
        ));
    }

    if config.analysis.timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "analysis.timeout_secs",
            "Must be greater than zero",
        ));
    }
    if config.analysis.reasoning_timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "analysis.reasoning_timeout_secs",
            "Must be greater than zero",
        ));
    }
    if config.analysis.max_tokens == 0 || config.analysis.max_completion_tokens == 0 {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "analysis",
            "Token budgets must be greater than zero",
        ));
    }

    for spec in FAMILY_REGISTRY {
        let path = format!("providers.{}.api_key", spec.family.id());
        if config.credential(spec.family).is_some() {
            diagnostics.push(Diagnostic::new(DiagnosticLevel::Ok, path, "Configured"));
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticLevel::Warn,
                path,
                format!(
                    "Not set; {} models will fail until {} is provided",
                    spec.display_name, spec.credential_env
                ),
            ));
        }
        if config.max_input_chars(spec.family) == 0 {
            diagnostics.push(Diagnostic::new(
                DiagnosticLevel::Error,
                format!("providers.{}.max_input_chars", spec.family.id()),
                "Must be greater than zero",
            ));
        }
    }

    if FAMILY_REGISTRY
        .iter()
        .all(|spec| config.credential(spec.family).is_none())
    {
        diagnostics.push(Diagnostic::new(
            DiagnosticLevel::Error,
            "providers",
            "No provider credential configured",
        ));
    }

    diagnostics
}
