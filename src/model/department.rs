use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Department codes accepted on every write path.
pub const CANONICAL_CODES: [&str; 4] = ["CSC", "ECE", "AI&ML", "CYBER"];

/// Free-text department names that older clients wrote before codes were
/// enforced, keyed to the code each one stands for. No key is itself a code.
pub static LEGACY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Computer Science", "CSC"),
        ("Computer Science and Engineering", "CSC"),
        ("Computer Science & Engineering", "CSC"),
        ("CSE", "CSC"),
        ("Electronics and Communication", "ECE"),
        ("Electronics and Communication Engineering", "ECE"),
        ("Electronics & Communication Engineering", "ECE"),
        ("Artificial Intelligence and Machine Learning", "AI&ML"),
        ("Artificial Intelligence & Machine Learning", "AI&ML"),
        ("AI & ML", "AI&ML"),
        ("AIML", "AI&ML"),
        ("Cyber Security", "CYBER"),
        ("Cybersecurity", "CYBER"),
        ("CSE (Cyber Security)", "CYBER"),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown department `{0}`")]
pub struct UnknownDepartment(pub String);

pub fn is_canonical(value: &str) -> bool {
    CANONICAL_CODES.contains(&value)
}

/// Code for a legacy free-text name, `None` for anything else (codes included).
pub fn legacy_code(value: &str) -> Option<&'static str> {
    LEGACY_NAMES.get(value).copied()
}

/// Maps department input onto the canonical code set.
///
/// Codes pass through (case-insensitively), legacy names are translated, and
/// anything else is rejected.
pub fn canonicalize(value: &str) -> Result<&'static str, UnknownDepartment> {
    let trimmed = value.trim();

    if let Some(code) = CANONICAL_CODES
        .iter()
        .copied()
        .find(|code| code.eq_ignore_ascii_case(trimmed))
    {
        return Ok(code);
    }

    legacy_code(trimmed).ok_or_else(|| UnknownDepartment(value.to_string()))
}

/// Department value to use in a read filter. Unknown values are kept as-is so
/// a query for stale data still finds it.
pub fn filter_value(value: &str) -> String {
    canonicalize(value)
        .map(str::to_string)
        .unwrap_or_else(|_| value.trim().to_string())
}
