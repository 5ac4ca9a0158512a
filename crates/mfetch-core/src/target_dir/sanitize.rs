//! URL to directory-name sanitization.

/// Separator substituted for every character outside the allow-set.
pub const SEPARATOR: char = '_';

/// Maximum length of a directory name, applied only when the directory is made.
pub const MAX_DIR_NAME: usize = 250;

/// Fallback when sanitization leaves nothing usable.
const EMPTY_FALLBACK: &str = "url";

/// Sanitizes a raw URL into a directory base name.
///
/// - Seeds from `host + path` when the URL parses, else from the raw string
/// - Replaces every non-ASCII-alphanumeric character with `_`
/// - Collapses consecutive separators and trims them from both ends
/// - Falls back to `"url"` when nothing is left
///
/// The result is NOT length-limited; see [`truncate`].
pub fn sanitize(raw_url: &str) -> String {
    let seed = match url::Url::parse(raw_url) {
        Ok(parsed) => format!("{}{}", parsed.host_str().unwrap_or(""), parsed.path()),
        Err(_) => raw_url.to_string(),
    };

    let mut out = String::with_capacity(seed.len());
    let mut prev_sep = false;
    for c in seed.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_sep = false;
        } else {
            if !prev_sep {
                out.push(SEPARATOR);
            }
            prev_sep = true;
        }
    }

    let trimmed = out.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Caps a sanitized base name at [`MAX_DIR_NAME`] characters.
///
/// Names within the cap are returned unchanged. When a cut happens, a
/// separator exposed at the cut point is dropped so the name survives
/// another [`sanitize`] pass unchanged.
pub fn truncate(base: &str) -> String {
    match base.char_indices().nth(MAX_DIR_NAME) {
        Some((idx, _)) => {
            let cut = base[..idx].trim_end_matches(SEPARATOR);
            if cut.is_empty() {
                base[..idx].to_string()
            } else {
                cut.to_string()
            }
        }
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_path_seed() {
        assert_eq!(
            sanitize("https://www.example.com/videos/clip-42?autoplay=1"),
            "www_example_com_videos_clip_42"
        );
    }

    #[test]
    fn query_and_fragment_ignored_when_parsed() {
        assert_eq!(
            sanitize("https://example.com/a#frag"),
            sanitize("https://example.com/a?x=1")
        );
    }

    #[test]
    fn unparseable_uses_raw_string() {
        assert_eq!(sanitize("not a url // at all"), "not_a_url_at_all");
    }

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(sanitize("--__a..b__--"), "a_b");
    }

    #[test]
    fn empty_result_falls_back() {
        assert_eq!(sanitize(""), "url");
        assert_eq!(sanitize("%%%///"), "url");
    }

    #[test]
    fn non_ascii_collapses_to_separator() {
        assert_eq!(sanitize("héllo wörld"), "h_llo_w_rld");
    }

    #[test]
    fn truncate_caps_length() {
        let long = "a".repeat(400);
        assert_eq!(truncate(&long).len(), MAX_DIR_NAME);
        assert_eq!(truncate(&"b".repeat(251)).len(), MAX_DIR_NAME);
    }

    #[test]
    fn truncate_short_is_noop() {
        assert_eq!(truncate("short_name"), "short_name");
        let exact = "c".repeat(MAX_DIR_NAME);
        assert_eq!(truncate(&exact), exact);
    }

    #[test]
    fn truncate_drops_separator_at_cut() {
        let base = format!("{}_{}", "d".repeat(MAX_DIR_NAME - 1), "tail");
        let name = truncate(&base);
        assert_eq!(name, "d".repeat(MAX_DIR_NAME - 1));
        assert_eq!(truncate(&sanitize(&name)), name);
    }

    #[test]
    fn sanitize_then_truncate_is_idempotent() {
        let path = "seg/".repeat(120);
        let urls = [
            "https://example.com/watch?v=abc".to_string(),
            format!("https://example.com/{path}"),
            "::::".to_string(),
            "plain words here".to_string(),
            format!("https://example.com/{}/{}", "x".repeat(237), "y".repeat(40)),
        ];
        for u in &urls {
            let once = truncate(&sanitize(u));
            let twice = truncate(&sanitize(&once));
            assert_eq!(once, twice, "not idempotent for {u}");
        }
    }
}
