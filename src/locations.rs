//! Parsing of newline-delimited region strings.
//!
//! Each line has the form `name:start-end`. Parsing never fails: a line
//! without separators or with non-numeric bounds becomes a request whose
//! bounds are `None`, and the resolver reports it when the batch is fetched.

use crate::types::RegionRequest;

/// Parse a block of region lines into requests, one per line, in order.
///
/// Empty text yields no requests. Blank lines inside non-empty text are kept
/// and become requests with an empty name.
pub fn parse(text: &str) -> Vec<RegionRequest> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Parse a single `name:start-end` line.
pub fn parse_line(line: &str) -> RegionRequest {
    let (name, rest) = match line.split_once(':') {
        Some((name, rest)) => (name, Some(rest)),
        None => (line, None),
    };

    let (start, end) = match rest.and_then(|r| r.split_once('-')) {
        Some((start, end)) => (parse_bound(start), parse_bound(end)),
        None => (rest.and_then(parse_bound), None),
    };

    RegionRequest {
        text: line.to_string(),
        name: name.to_string(),
        start,
        end,
    }
}

fn parse_bound(s: &str) -> Option<u64> {
    s.trim().parse().ok()
}
