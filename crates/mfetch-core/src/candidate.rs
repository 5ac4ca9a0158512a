//! Classification and ordering of discovered media-manifest URLs.
//!
//! Master playlists reference every quality variant, so they are tried
//! before anything else. Within a tier, first-observed order wins.

use std::collections::HashSet;

/// Manifest-file suffix recognized during discovery.
pub const MANIFEST_SUFFIX: &str = ".m3u8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateTier {
    Master,
    Other,
}

/// A media-manifest URL seen while a page was loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    pub url: String,
    pub tier: CandidateTier,
}

/// True if `url` ends in the manifest suffix, optionally followed by a query.
pub fn is_manifest_url(url: &str) -> bool {
    ends_with_ignore_case(strip_query(url), MANIFEST_SUFFIX)
}

/// True if the last path segment is `master[<sep><qualifier>].m3u8`.
///
/// Accepted separators are `_` and `-` (`master_720.m3u8`, `master-hd.m3u8`).
pub fn is_master_url(url: &str) -> bool {
    let path = strip_query(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    if !ends_with_ignore_case(segment, MANIFEST_SUFFIX) {
        return false;
    }
    let stem = segment[..segment.len() - MANIFEST_SUFFIX.len()].to_ascii_lowercase();
    match stem.strip_prefix("master") {
        Some("") => true,
        Some(rest) => {
            let mut chars = rest.chars();
            matches!(chars.next(), Some('_') | Some('-')) && chars.next().is_some()
        }
        None => false,
    }
}

pub fn classify(url: &str) -> CandidateTier {
    if is_master_url(url) {
        CandidateTier::Master
    } else {
        CandidateTier::Other
    }
}

/// Ranks observed URLs: masters first, then others, each in observation order.
///
/// Exact-string duplicates keep their first position only.
pub fn rank<I, S>(urls: I) -> Vec<CandidateUrl>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set = CandidateSet::default();
    for u in urls {
        set.insert(u.into());
    }
    set.into_ranked()
}

/// Insertion-ordered, de-duplicated accumulator fed while a page is observed.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<String>,
    masters: Vec<String>,
    others: Vec<String>,
}

impl CandidateSet {
    /// Records `url` if it is a manifest URL not seen before. Returns whether it was kept.
    pub fn consider(&mut self, url: &str) -> bool {
        if !is_manifest_url(url) {
            return false;
        }
        self.insert(url.to_string())
    }

    fn insert(&mut self, url: String) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        match classify(&url) {
            CandidateTier::Master => self.masters.push(url),
            CandidateTier::Other => self.others.push(url),
        }
        true
    }

    pub fn len(&self) -> usize {
        self.masters.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_ranked(self) -> Vec<CandidateUrl> {
        let masters = self.masters.into_iter().map(|url| CandidateUrl {
            url,
            tier: CandidateTier::Master,
        });
        let others = self.others.into_iter().map(|url| CandidateUrl {
            url,
            tier: CandidateTier::Other,
        });
        masters.chain(others).collect()
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(ranked: &[CandidateUrl]) -> Vec<&str> {
        ranked.iter().map(|c| c.url.as_str()).collect()
    }

    #[test]
    fn masters_before_others_preserving_order() {
        let ranked = rank([
            "https://x/a/master_720.m3u8",
            "https://x/b.m3u8",
            "https://x/master.m3u8?t=1",
        ]);
        assert_eq!(
            urls(&ranked),
            vec![
                "https://x/a/master_720.m3u8",
                "https://x/master.m3u8?t=1",
                "https://x/b.m3u8",
            ]
        );
        assert_eq!(ranked[0].tier, CandidateTier::Master);
        assert_eq!(ranked[1].tier, CandidateTier::Master);
        assert_eq!(ranked[2].tier, CandidateTier::Other);
    }

    #[test]
    fn duplicates_suppressed() {
        let ranked = rank([
            "https://x/b.m3u8",
            "https://x/master.m3u8",
            "https://x/b.m3u8",
            "https://x/master.m3u8",
        ]);
        assert_eq!(urls(&ranked), vec!["https://x/master.m3u8", "https://x/b.m3u8"]);
    }

    #[test]
    fn master_pattern() {
        assert!(is_master_url("https://cdn/x/master.m3u8"));
        assert!(is_master_url("https://cdn/x/MASTER.M3U8"));
        assert!(is_master_url("https://cdn/x/master-hd.m3u8?token=1"));
        assert!(is_master_url("https://cdn/x/master_1080p.m3u8"));
        assert!(!is_master_url("https://cdn/x/mastering.m3u8"));
        assert!(!is_master_url("https://cdn/x/master_.m3u8"));
        assert!(!is_master_url("https://cdn/master/index.m3u8"));
        assert!(!is_master_url("https://cdn/x/master.mp4"));
    }

    #[test]
    fn manifest_suffix() {
        assert!(is_manifest_url("https://cdn/x/index.m3u8"));
        assert!(is_manifest_url("https://cdn/x/INDEX.M3U8?sig=abc"));
        assert!(!is_manifest_url("https://cdn/x/index.m3u8.bak"));
        assert!(!is_manifest_url("https://cdn/x/seg-001.ts"));
        assert!(!is_manifest_url("https://cdn/x/playlist.mpd"));
    }

    #[test]
    fn candidate_set_filters_non_manifests() {
        let mut set = CandidateSet::default();
        assert!(!set.consider("https://cdn/app.js"));
        assert!(set.consider("https://cdn/index.m3u8"));
        assert!(!set.consider("https://cdn/index.m3u8"));
        assert!(set.consider("https://cdn/master.m3u8"));
        assert_eq!(set.len(), 2);
        let ranked = set.into_ranked();
        assert_eq!(urls(&ranked), vec!["https://cdn/master.m3u8", "https://cdn/index.m3u8"]);
    }

    #[test]
    fn empty_input() {
        assert!(rank(Vec::<String>::new()).is_empty());
        assert!(CandidateSet::default().is_empty());
    }
}
