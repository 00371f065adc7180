//! Registrable-domain decomposition of stored URLs.
//!
//! Key functions:
//! - `decompose_url()` - splits a URL into registrable domain and subdomain
//!
//! The persisted encoding of the result (`domain` / `subdomain` columns) is
//! handled by `DomainParts::into_columns()`.

use tldextract::TldExtractor;

/// Conventional host label that never counts as a subdomain.
const WWW_LABEL: &str = "www";

/// Result of decomposing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainParts {
    /// A recognised public suffix was found.
    Registrable {
        /// e.g. `example.co.uk`
        domain: String,
        /// Full host below the registrable domain, e.g. `shop.example.co.uk`.
        /// `None` when the host is the bare domain or the `www` alias.
        subdomain: Option<String>,
    },
    /// No recognised public suffix, or nothing registrable in front of it.
    Unresolvable,
}

impl DomainParts {
    /// Column values for `websites.domain` and `websites.subdomain`.
    ///
    /// `Unresolvable` is stored as an empty domain so the row leaves the
    /// `domain IS NULL` backlog for good.
    pub fn into_columns(self) -> (String, Option<String>) {
        match self {
            DomainParts::Registrable { domain, subdomain } => (domain, subdomain),
            DomainParts::Unresolvable => (String::new(), None),
        }
    }
}

/// Splits a raw URL into registrable domain and subdomain.
///
/// # Arguments
///
/// * `extractor` - The TldExtractor instance
/// * `url` - The URL as stored by the harvester (scheme and path are allowed)
///
/// # Returns
///
/// `Registrable` with `domain = "<label>.<suffix>"` and `subdomain` set only when
/// a non-`www` label precedes the domain, otherwise `Unresolvable`. Never fails:
/// anything the extractor cannot classify is `Unresolvable`.
///
/// # Examples
///
/// ```ignore
/// let ex = init_extractor();
/// assert_eq!(
///     decompose_url(&ex, "http://shop.example.com/x"),
///     DomainParts::Registrable {
///         domain: "example.com".into(),
///         subdomain: Some("shop.example.com".into()),
///     }
/// );
/// ```
pub fn decompose_url(extractor: &TldExtractor, url: &str) -> DomainParts {
    let Ok(parts) = extractor.extract(url.trim()) else {
        return DomainParts::Unresolvable;
    };

    let suffix = parts.suffix.filter(|s| !s.is_empty());
    let label = parts.domain.filter(|d| !d.is_empty());
    let (Some(label), Some(suffix)) = (label, suffix) else {
        return DomainParts::Unresolvable;
    };

    let domain = format!("{}.{}", label, suffix);
    let subdomain = parts
        .subdomain
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(WWW_LABEL))
        .map(|s| format!("{}.{}", s, domain));

    DomainParts::Registrable { domain, subdomain }
}
