use anyhow::{Context, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use unicode_normalization::UnicodeNormalization;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Directory-safe name: `"Johnson & Johnson"` -> `"johnson-johnson"`.
pub fn slugify(s: &str) -> Result<String> {
    let non_slug = Regex::new(r"[^a-z0-9]+")?;
    let folded: String = s
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase();
    let slug = non_slug.replace_all(&folded, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        Ok("report".to_string())
    } else {
        Ok(slug.to_string())
    }
}
