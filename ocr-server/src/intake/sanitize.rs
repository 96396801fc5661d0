use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Runs of anything that is not a lowercase ASCII letter or digit.
static NON_SLUG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Token used when nothing survives sanitization.
pub const FALLBACK_TOKEN: &str = "upload";

pub const MAX_TOKEN_LEN: usize = 64;

/// Turn an untrusted client filename into a slug that is safe to embed in a
/// filesystem path.
///
/// Accented letters are folded to ASCII through NFKD decomposition, anything
/// else outside `[a-z0-9]` collapses into a single `-`. The result never
/// contains path separators or dots, so `../` and absolute paths cannot leak
/// through.
pub fn sanitize(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| c.is_ascii() && *c != '\'')
        .collect::<String>()
        .to_ascii_lowercase();

    let slug = NON_SLUG_RUN.replace_all(&folded, "-");
    let mut token: String = slug.trim_matches('-').chars().take(MAX_TOKEN_LEN).collect();
    while token.ends_with('-') {
        token.pop();
    }

    if token.is_empty() {
        FALLBACK_TOKEN.to_string()
    } else {
        token
    }
}
