//! Secret redaction for persisted command text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement for redacted flag values.
pub const REDACTED: &str = "***";

/// `-Password <value>` and friends. The flag name is kept so the record
/// stays readable; only the value is replaced.
static SECRET_FLAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-(?:Password|ApiKey|Secret|Token))\s+\S+")
        .expect("Invalid secret flag regex")
});

/// Redact secret flag values from command text.
///
/// Runs unconditionally on every history append; there is no opt-out.
pub fn redact_sensitive(text: &str) -> String {
    SECRET_FLAG_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{} {REDACTED}", &caps[1])
        })
        .into_owned()
}
