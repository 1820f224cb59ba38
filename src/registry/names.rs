//! Event-name string parsing.
//!
//! One registration or emit call may target several names at once; the
//! delimiter grammar is whitespace or a comma with optional trailing
//! whitespace: `"save load, error"` → `save`, `load`, `error`. Empty
//! fragments (doubled delimiters, blank input) are dropped.

use std::sync::OnceLock;

use regex::Regex;

/// Reserved catch-all event name. Every registration also files a record
/// under this name; it is dispatched only when named explicitly in an emit.
pub const CATCH_ALL: &str = "all";

static SPLIT_REGEX: OnceLock<Regex> = OnceLock::new();

fn split_regex() -> &'static Regex {
    SPLIT_REGEX.get_or_init(|| Regex::new(r"\s+|,\s?").expect("split regex is valid"))
}

/// Split `events` into individual names, dropping empty fragments.
pub(crate) fn parse_event_names(events: &str) -> Vec<String> {
    split_regex()
        .split(events)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Names a registration call targets: the parsed names plus [`CATCH_ALL`],
/// appended once. If the caller already named `"all"` explicitly it is not
/// duplicated — a single registration never files two records under one name.
pub(crate) fn registration_targets(events: &str) -> Vec<String> {
    let mut names = parse_event_names(events);
    if !names.is_empty() && !names.iter().any(|name| name == CATCH_ALL) {
        names.push(CATCH_ALL.to_owned());
    }
    names
}
