//! URL canonicalization and crawl scoping.
//!
//! Every URL the crawler touches is reduced to a `(scheme, host, path)` triple
//! with no query, no fragment and no trailing slash. Two URLs are the same page
//! iff their triples are equal.

use crate::error::{Result, ScanError};
use std::fmt;
use url::{Position, Url};

/// Hrefs that never point at a new page.
const INVALID_HREFS: &[&str] = &["/", "#"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    scheme: String,
    host: String,
    path: String,
}

impl NormalizedUrl {
    /// Normalize an absolute URL, such as the seed supplied by the user.
    ///
    /// This is the only fallible entry point: a malformed seed aborts the crawl,
    /// whereas a malformed discovered href is just discarded.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if !raw.starts_with("http") {
            return Err(ScanError::InvalidUrl(format!(
                "{} (expected an http:// or https:// URL, e.g. https://github.com)",
                raw
            )));
        }

        let parsed =
            Url::parse(raw).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;

        Self::from_url(&parsed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no usable host", raw)))
    }

    pub(crate) fn from_parts(scheme: &str, host: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: trim_path(path),
        }
    }

    fn from_url(url: &Url) -> Option<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.host_str()?;

        // host plus an explicit port, if any
        let host = &url[Position::BeforeHost..Position::AfterPort];

        Some(Self::from_parts(url.scheme(), host, url.path()))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path without trailing slash; the root is the empty string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical visited-set key, `scheme://host/path`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    fn to_url(&self) -> Option<Url> {
        Url::parse(&self.key()).ok()
    }

    fn origin(&self) -> Option<Url> {
        Url::parse(&format!("{}://{}/", self.scheme, self.host)).ok()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// Normalize an href found on `page`.
///
/// Returns `None` for anything that should not be followed: fragment-only
/// links, sentinel values, unparseable input, non-http schemes and links to
/// another host.
///
/// Bare relative hrefs resolve against the normalized page URL, which has no
/// trailing slash. On a page served as `https://x/docs/`, `intro` therefore
/// becomes `https://x/intro`, not `https://x/docs/intro`, and falls outside a
/// `/docs` scope. Root-relative and absolute hrefs are unaffected.
pub fn normalize_href(href: &str, page: &NormalizedUrl) -> Option<NormalizedUrl> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || INVALID_HREFS.contains(&href) {
        return None;
    }

    let resolved = if href.starts_with("http") {
        Url::parse(href).ok()?
    } else if let Some(rest) = href.strip_prefix("//") {
        // protocol-relative
        Url::parse(&format!("{}://{}", page.scheme, rest)).ok()?
    } else if href.starts_with('/') {
        page.origin()?.join(href).ok()?
    } else {
        page.to_url()?.join(href).ok()?
    };

    let normalized = NormalizedUrl::from_url(&resolved)?;
    if normalized.host != page.host {
        return None;
    }

    Some(normalized)
}

/// True iff `candidate` is `scope` or lies below it on a segment boundary.
pub fn in_scope(candidate: &str, scope: &str) -> bool {
    candidate == scope
        || candidate
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Collapse repeated `/` and drop the trailing one, so `/docs//a/` and
/// `/docs/a` share a key and therefore a mirror file.
fn trim_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut trimmed, segment| {
            trimmed.push('/');
            trimmed.push_str(segment);
            trimmed
        })
}

/// The fixed scope of one crawl, derived from the seed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    seed: NormalizedUrl,
}

impl CrawlTarget {
    pub fn from_seed(raw: &str) -> Result<Self> {
        Ok(Self {
            seed: NormalizedUrl::parse(raw)?,
        })
    }

    pub fn seed(&self) -> &NormalizedUrl {
        &self.seed
    }

    pub fn scheme(&self) -> &str {
        self.seed.scheme()
    }

    pub fn host(&self) -> &str {
        self.seed.host()
    }

    pub fn scope_path(&self) -> &str {
        self.seed.path()
    }

    /// Same host and inside the seed's path scope.
    pub fn admits(&self, url: &NormalizedUrl) -> bool {
        url.host() == self.host() && in_scope(url.path(), self.scope_path())
    }

    /// Rebuild `url` on the target's scheme so `http` and `https` links to the
    /// same page share one key.
    pub fn canonicalize(&self, url: &NormalizedUrl) -> NormalizedUrl {
        NormalizedUrl::from_parts(self.scheme(), self.host(), url.path())
    }
}
