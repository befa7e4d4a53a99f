//! Prometheus text exposition format.
//!
//! Rendering goes through [`prometheus::TextEncoder`]. The parser reads such
//! text back into samples, which is how batch output and scrapes are checked.

use crate::models::LabelSet;
use crate::registry::{MetricRegistry, RegistryError};
use prometheus::{Encoder, TextEncoder};
use thiserror::Error;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Errors that can occur while parsing exposition text.
#[derive(Debug, Error)]
pub enum ExpositionError {
    /// A sample line could not be parsed.
    #[error("Invalid exposition at line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// A sample line parsed from exposition text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSample {
    /// The metric name.
    pub name: String,
    /// The sample labels.
    pub labels: LabelSet,
    /// The sample value.
    pub value: f64,
    /// Milliseconds since the Unix epoch, if present.
    pub timestamp_ms: Option<i64>,
}

/// Renders every observed sample of the registry.
///
/// Families are ordered by name and samples by label values, so the output for
/// a given registry is stable.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn render(registry: &MetricRegistry) -> Result<String, RegistryError> {
    let families = registry.gather();
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|e| RegistryError::Prometheus(prometheus::Error::Msg(e.to_string())))
}

/// Parses exposition text into samples, skipping comments and blank lines.
///
/// # Errors
///
/// Returns [`ExpositionError::Parse`] on the first malformed sample line.
pub fn parse(text: &str) -> Result<Vec<ParsedSample>, ExpositionError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(i, line)| {
            parse_line(line.trim()).map_err(|message| ExpositionError::Parse {
                line: i + 1,
                message,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<ParsedSample, String> {
    let name_end = line
        .find(|c: char| c == '{' || c.is_whitespace())
        .ok_or_else(|| "missing value".to_string())?;
    let name = &line[..name_end];
    if name.is_empty() {
        return Err("missing metric name".to_string());
    }

    let mut rest = &line[name_end..];
    let mut labels = LabelSet::new();
    if let Some(after_brace) = rest.strip_prefix('{') {
        let (parsed, remaining) = parse_labels(after_brace)?;
        labels = parsed;
        rest = remaining;
    }

    let mut fields = rest.split_whitespace();
    let value = fields
        .next()
        .ok_or_else(|| "missing value".to_string())
        .and_then(parse_value)?;
    let timestamp_ms = fields
        .next()
        .map(|ts| ts.parse::<i64>().map_err(|e| format!("invalid timestamp '{ts}': {e}")))
        .transpose()?;
    if fields.next().is_some() {
        return Err("unexpected trailing fields".to_string());
    }

    Ok(ParsedSample {
        name: name.to_string(),
        labels,
        value,
        timestamp_ms,
    })
}

/// Parses `k="v",...}` and returns the labels plus the text after `}`.
fn parse_labels(input: &str) -> Result<(LabelSet, &str), String> {
    let mut labels = LabelSet::new();
    let mut rest = input.trim_start();

    loop {
        if let Some(after) = rest.strip_prefix('}') {
            return Ok((labels, after));
        }

        let eq = rest
            .find('=')
            .ok_or_else(|| "label without value".to_string())?;
        let key = rest[..eq].trim();
        if key.is_empty() {
            return Err("empty label name".to_string());
        }
        rest = rest[eq + 1..]
            .trim_start()
            .strip_prefix('"')
            .ok_or_else(|| format!("label '{key}' value is not quoted"))?;

        let mut value = String::new();
        let mut chars = rest.char_indices();
        let end = loop {
            match chars.next() {
                Some((i, '"')) => break i,
                Some((_, '\\')) => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, c)) => value.push(c),
                    None => return Err("unterminated escape".to_string()),
                },
                Some((_, c)) => value.push(c),
                None => return Err(format!("unterminated value for label '{key}'")),
            }
        };
        labels.insert(key.to_string(), value);

        rest = rest[end + 1..].trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
        } else if !rest.starts_with('}') {
            return Err("expected ',' or '}' after label".to_string());
        }
    }
}

fn parse_value(raw: &str) -> Result<f64, String> {
    match raw {
        "NaN" => Ok(f64::NAN),
        "+Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        _ => raw
            .parse::<f64>()
            .map_err(|e| format!("invalid value '{raw}': {e}")),
    }
}
