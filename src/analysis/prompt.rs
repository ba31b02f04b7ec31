//! Analysis prompt construction.
//!
//! Serializes caller data to text, enforces the per-family length limit and
//! substitutes the result into the family's analysis template.

use serde_json::Value;

use crate::analysis::translate::ErrorContext;
use crate::error::{AnalysisError, ErrorKind};

/// Substitution point every template carries exactly once.
pub const DATA_PLACEHOLDER: &str = "{data}";

/// Appended after the cut when serialized data exceeds the limit.
pub const TRUNCATION_MARKER: &str = "\n\n[Data truncated for processing...]";

/// Structured assessment template used for OpenAI models.
pub const ASSESSMENT_TEMPLATE: &str = "You are an expert cybersecurity analyst specializing in Censys host data analysis.

Analyze the provided Censys host dataset and provide a comprehensive, in-depth security assessment.

Your analysis should include:

1. **Overview**: Dataset size, scope, and overall risk level (Critical/High/Medium/Low)
2. **Critical Findings**: Immediate security threats requiring urgent attention
   - Active malware/C2 infrastructure
   - Critical vulnerabilities (CVSS >= 7.0) with CVE numbers
   - Known exploited vulnerabilities
3. **Geographic & Infrastructure Patterns**: Notable hosting providers, ASNs, and geographic clustering
4. **Service Analysis**: Exposed services, unusual ports, and authentication gaps
5. **Security Concerns**: Misconfigurations, outdated software, and suspicious indicators
6. **Immediate Actions**: Top 3 priority recommendations and key IOCs for blocking/monitoring

Analyze the data systematically:
- Inspect the data structure and identify key security indicators
- Calculate statistics for ports, services, and geographic distribution
- Identify high-risk patterns and anomalies
- Cross-reference findings with known vulnerability databases
- Provide evidence-based insights with specific examples from the data

Format your final response as clear, structured text with bullet points.
Prioritize actionable insights over descriptive analysis. Include specific technical details (CVE IDs, CVSS scores, ports, IPs) when relevant.

Dataset to analyze:
{data}";

/// Shorter summary template used for GitHub Models.
pub const SUMMARY_TEMPLATE: &str = "You are an expert cybersecurity analyst specializing in Censys host data analysis.
Your task is to analyze the provided host data and create a comprehensive, actionable summary.
Data to analyze:
{data}
Please provide a summary that includes:

Overview: Dataset size, scope, and overall risk level (Critical/High/Medium/Low)
Critical Findings: Immediate security threats requiring urgent attention
  - Active malware/C2 infrastructure
  - Critical vulnerabilities (CVSS >= 7.0) with CVE numbers
  - Known exploited vulnerabilities
Geographic & Infrastructure Patterns: Notable hosting providers, ASNs, and geographic clustering
Service Analysis: Exposed services, unusual ports, and authentication gaps
Security Concerns: Misconfigurations, outdated software, and suspicious indicators
Immediate Actions: Top 3 priority recommendations and key IOCs for blocking/monitoring

Format your response as clear, structured text with bullet points where appropriate.
Prioritize actionable insights over descriptive analysis. Include specific technical details (CVE IDs, CVSS scores, ports) when relevant";

/// A prompt ready for the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    /// Template with the data substituted
    pub text: String,
    /// Length in chars of the substituted data segment, marker included
    pub data_chars: usize,
    /// Whether the data was cut to fit the limit
    pub truncated: bool,
}

/// Serialize `raw` to the text that goes into the template.
///
/// Strings pass through verbatim; everything else becomes two-space indented
/// JSON. Object keys come out in a fixed order, so the result is deterministic.
pub fn serialize_data(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Build the prompt for `raw` using `template`, cutting data beyond `max_chars`.
pub fn build(raw: &Value, template: &str, max_chars: usize) -> Result<BuiltPrompt, AnalysisError> {
    if !template.contains(DATA_PLACEHOLDER) {
        return Err(AnalysisError::new(
            ErrorKind::TemplateError,
            &ErrorContext::default(),
        ));
    }

    let mut data = serialize_data(raw);
    let total_chars = data.chars().count();
    let truncated = total_chars > max_chars;

    if truncated {
        let cut = data
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(data.len());
        data.truncate(cut);
        data.push_str(TRUNCATION_MARKER);
    }

    let data_chars = if truncated {
        max_chars + TRUNCATION_MARKER.chars().count()
    } else {
        total_chars
    };

    Ok(BuiltPrompt {
        text: template.replacen(DATA_PLACEHOLDER, &data, 1),
        data_chars,
        truncated,
    })
}
