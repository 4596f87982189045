use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Token prefixes that are secret themselves (`sk-abc...`).
const SECRET_PREFIXES: [&str; 2] = ["sk-", "sess-"];

/// Markers followed by a secret value.
const SECRET_MARKERS: [&str; 6] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "api_key=",
    "\"api_key\":\"",
    "\"token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

/// Byte offset where the secret-looking run starting at `from` ends.
fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

fn redact_after(scrubbed: &mut String, marker: &str, keep_marker: bool) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let value_start = start + marker.len();
        let end = token_end(scrubbed, value_start);

        // A bare marker with no value is not a secret.
        if end == value_start {
            search_from = value_start;
            continue;
        }

        let replace_from = if keep_marker { value_start } else { start };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Redact API keys and bearer tokens from text that may be logged or shown.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let dirty = SECRET_PREFIXES
        .iter()
        .chain(SECRET_MARKERS.iter())
        .any(|pattern| input.contains(pattern));
    if !dirty {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for prefix in SECRET_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    for marker in SECRET_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    Cow::Owned(scrubbed)
}

/// Scrub, then truncate to a length that fits in a log line.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let end = scrubbed
        .char_indices()
        .nth(MAX_API_ERROR_CHARS)
        .map_or(scrubbed.len(), |(i, _)| i);
    format!("{}...", &scrubbed[..end])
}

/// Error for a non-success completion response, carrying status and scrubbed body.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    anyhow::anyhow!("{provider} API error ({status}): {}", sanitize_api_error(&body))
}
