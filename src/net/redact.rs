//! Scrubs header blocks before they are written to the network log.
//!
//! A header block is the `Name: value` per line text shown in the log
//! panel. Provider diagnostic headers are dropped outright and
//! anything carrying a credential keeps its name but loses its value.

pub const MASK: &str = "*******";

// Diagnostics Azure OpenAI and API Management attach to every response
const DROPPED_HEADERS: [&str; 10] = [
    "x-ms-client-request-id",
    "x-ms-deployment-name",
    "x-ms-rai-invoked",
    "x-ms-region",
    "x-ratelimit-limit-requests",
    "x-ratelimit-limit-tokens",
    "x-ratelimit-remaining-requests",
    "x-ratelimit-remaining-tokens",
    "azureml-model-session",
    "apim-request-id",
];

const MASKED_PREFIXES: [&str; 5] = [
    "authorization:",
    "api-key:",
    "x-api-key:",
    "test-key:",
    "bearer ",
];

fn is_dropped(line: &str) -> bool {
    DROPPED_HEADERS.iter().any(|name| {
        line.get(..name.len() + 1)
            .map(|prefix| {
                prefix.ends_with(':') && prefix[..name.len()].eq_ignore_ascii_case(name)
            })
            .unwrap_or(false)
    })
}

fn is_masked(line: &str) -> bool {
    MASKED_PREFIXES.iter().any(|prefix| {
        line.get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    })
}

fn redact_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if is_dropped(trimmed) {
        return None;
    }
    if is_masked(trimmed) {
        // A bare `Bearer xyz` line has no name to keep so it passes
        // through untouched
        if let Some(colon) = trimmed.find(':') {
            return Some(format!("{} {}", &trimmed[..=colon], MASK));
        }
    }
    Some(line.to_string())
}

/// Drop diagnostic headers and mask credentials in a newline
/// delimited header block. Other lines keep their content and order.
pub fn redact(header_block: &str) -> String {
    if header_block.is_empty() {
        return String::new();
    }
    header_block
        .split('\n')
        .filter_map(redact_line)
        .collect::<Vec<String>>()
        .join("\n")
}

/// Render header pairs as a block, one `name: value` per line.
pub fn header_block<K: AsRef<str>, V: AsRef<str>>(headers: &[(K, V)]) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k.as_ref(), v.as_ref()))
        .collect::<Vec<String>>()
        .join("\n")
}
