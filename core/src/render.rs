//! Pure projections from decomposition results and failures to display models.
//!
//! Nothing here performs IO. `View` is what a host draws: the terminal host
//! prints it through `Display`, tests assert on its fields.

use std::fmt;

use crate::error::DecomposeFailure;
use crate::types::{QueryParams, UrlDecomposition};

/// Placeholder for a missing, null or empty value.
pub const PLACEHOLDER: &str = "-";

pub const VALIDATION_ERROR_TITLE: &str = "Invalid URL format";
pub const GENERIC_ERROR_TITLE: &str = "An error occurred while analyzing the URL";
pub const EXAMPLES_LABEL: &str = "Valid examples:";

/// Shown under generic failures, where the server supplied no examples.
pub const FALLBACK_EXAMPLES: [&str; 3] = [
    "https://www.example.com",
    "https://api.github.com:443/repos/user/repo",
    "http://localhost:8000/api",
];

/// Row labels, in display order.
pub const ROW_LABELS: [&str; 7] = [
    "Scheme",
    "Host",
    "Port",
    "Path",
    "Query string",
    "Query parameters",
    "Fragment",
];

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub label: &'static str,
    pub value: String,
}

/// Error panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: &'static str,
    pub message: String,
    pub rules: Vec<String>,
    pub examples: Vec<String>,
}

/// Derived display model of the decomposition form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Empty,
    Result(Vec<ResultRow>),
    Error(ErrorView),
}

/// Project a decomposition onto the fixed seven-row table.
pub fn result_rows(result: &UrlDecomposition) -> Vec<ResultRow> {
    let values = [
        scalar(result.scheme.as_deref()),
        scalar(result.netloc.as_deref()),
        result
            .port
            .map_or_else(|| PLACEHOLDER.to_string(), |port| port.to_string()),
        scalar(result.path.as_deref()),
        scalar(result.query_string.as_deref()),
        query_params(result.query_params.as_ref()),
        scalar(result.fragment.as_deref()),
    ];
    ROW_LABELS
        .into_iter()
        .zip(values)
        .map(|(label, value)| ResultRow { label, value })
        .collect()
}

/// Project a failure onto the error panel.
pub fn error_view(failure: &DecomposeFailure) -> ErrorView {
    match failure {
        DecomposeFailure::Validation(detail) => ErrorView {
            title: VALIDATION_ERROR_TITLE,
            message: detail.message.clone(),
            rules: detail.rules.clone(),
            examples: detail.examples.clone(),
        },
        DecomposeFailure::UnexpectedResponse { .. } | DecomposeFailure::Transport(_) => ErrorView {
            title: GENERIC_ERROR_TITLE,
            message: failure.message().to_string(),
            rules: Vec::new(),
            examples: FALLBACK_EXAMPLES.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn scalar(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// `key: v1, v2`, one line per key, in source order.
fn query_params(params: Option<&QueryParams>) -> String {
    match params {
        Some(params) if !params.is_empty() => params
            .iter()
            .map(|(key, values)| format!("{key}: {}", values.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => PLACEHOLDER.to_string(),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Empty => Ok(()),
            View::Result(rows) => {
                let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
                for row in rows {
                    let mut lines = row.value.lines();
                    let first = lines.next().unwrap_or(PLACEHOLDER);
                    writeln!(f, "{:<width$}  {first}", row.label)?;
                    for line in lines {
                        writeln!(f, "{:<width$}  {line}", "")?;
                    }
                }
                Ok(())
            }
            View::Error(view) => write!(f, "{view}"),
        }
    }
}

impl fmt::Display for ErrorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if !self.message.is_empty() && self.message != self.title {
            writeln!(f, "{}", self.message)?;
        }
        for rule in &self.rules {
            writeln!(f, "  • {rule}")?;
        }
        if !self.examples.is_empty() {
            writeln!(f, "{EXAMPLES_LABEL}")?;
            for example in &self.examples {
                writeln!(f, "  {example}")?;
            }
        }
        Ok(())
    }
}
