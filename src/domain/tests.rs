// Domain module tests.

use super::*;
use crate::initialization::init_extractor;

fn registrable(domain: &str, subdomain: Option<&str>) -> DomainParts {
    DomainParts::Registrable {
        domain: domain.to_string(),
        subdomain: subdomain.map(str::to_string),
    }
}

#[test]
fn test_www_is_not_a_subdomain() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "http://www.example.com/x"),
        registrable("example.com", None)
    );
}

#[test]
fn test_www_comparison_ignores_case() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "https://WWW.example.com/"),
        registrable("example.com", None)
    );
}

#[test]
fn test_subdomain_is_full_host() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "http://shop.example.com/x"),
        registrable("example.com", Some("shop.example.com"))
    );
}

#[test]
fn test_bare_domain() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "https://example.com"),
        registrable("example.com", None)
    );
}

#[test]
fn test_multi_part_suffix() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "https://www.bbc.co.uk/news"),
        registrable("bbc.co.uk", None)
    );
    assert_eq!(
        decompose_url(&extractor, "https://shop.example.co.uk/"),
        registrable("example.co.uk", Some("shop.example.co.uk"))
    );
}

#[test]
fn test_nested_subdomains_are_kept_whole() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "https://a.b.example.com/path?q=1#frag"),
        registrable("example.com", Some("a.b.example.com"))
    );
}

#[test]
fn test_port_is_ignored() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "https://www.example.com:8080/path"),
        registrable("example.com", None)
    );
}

#[test]
fn test_localhost_is_unresolvable() {
    let extractor = init_extractor();
    assert_eq!(
        decompose_url(&extractor, "http://localhost/x"),
        DomainParts::Unresolvable
    );
}

#[test]
fn test_unresolvable_columns_use_empty_sentinel() {
    assert_eq!(
        DomainParts::Unresolvable.into_columns(),
        (String::new(), None)
    );
    assert_eq!(
        registrable("example.com", Some("shop.example.com")).into_columns(),
        ("example.com".to_string(), Some("shop.example.com".to_string()))
    );
}
