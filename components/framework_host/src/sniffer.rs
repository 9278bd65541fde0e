//! Bundle-version sniffer.
//!
//! Classifies a bundle's target framework and version from its header: an
//! optional first line of the form `// {JSON}` carrying string `framework`
//! and `version` fields. Anything else (no comment, malformed JSON,
//! missing or non-string fields) yields no info, which is not an error.
//! Only the first line is ever inspected, regardless of bundle size.

use regex::Regex;
use std::sync::OnceLock;

/// Framework and version extracted from a bundle header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInfo {
    pub framework: String,
    pub version: String,
}

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^\s*//\s*(\{.*\})\s*$").expect("header pattern is valid"))
}

/// Sniffs a bundle's framework and version from its first line.
///
/// Tolerates both LF and CRLF line endings.
pub fn sniff(source: &str) -> Option<BundleInfo> {
    let first_line = match source.find('\n') {
        Some(index) => &source[..index],
        None => source,
    };
    let line = first_line.strip_suffix('\r').unwrap_or(first_line);

    let payload = header_pattern().captures(line)?.get(1)?.as_str();
    let header: serde_json::Value = serde_json::from_str(payload).ok()?;
    let framework = header.get("framework")?.as_str()?;
    let version = header.get("version")?.as_str()?;
    Some(BundleInfo {
        framework: framework.to_string(),
        version: version.to_string(),
    })
}
