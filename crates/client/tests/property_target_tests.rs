//! Property-based tests for request target resolution.
//!
//! This module uses proptest to verify:
//! - Bare paths always resolve onto the controller host and scheme
//! - Fully-qualified URLs are never rewritten
//! - Resolution never panics on arbitrary input

use apic_client::proxy::resolve_target;
use proptest::prelude::*;
use url::Url;

fn controller() -> Url {
    Url::parse("https://10.0.0.1/").unwrap()
}

proptest! {
    #[test]
    fn prop_bare_paths_resolve_onto_controller(
        segments in prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 1..6),
        leading_slash in any::<bool>(),
    ) {
        let mut target = segments.join("/");
        if leading_slash {
            target.insert(0, '/');
        }

        let url = resolve_target(&controller(), &target).unwrap();

        prop_assert_eq!(url.scheme(), "https");
        prop_assert_eq!(url.host_str(), Some("10.0.0.1"));
        prop_assert!(url.path().starts_with('/'));
    }

    #[test]
    fn prop_absolute_urls_are_unchanged(
        scheme in prop::sample::select(vec!["http", "https"]),
        host in "[a-z][a-z0-9]{0,10}(\\.[a-z]{2,5})?",
        port in proptest::option::of(1024u16..65535),
        path in "(/[a-zA-Z0-9_-]{1,8}){0,4}",
    ) {
        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };
        let target = format!("{scheme}://{authority}{path}");
        let expected = Url::parse(&target).unwrap();

        let url = resolve_target(&controller(), &target).unwrap();

        prop_assert_eq!(url, expected);
    }

    #[test]
    fn prop_resolution_never_panics(target in "\\PC{0,64}") {
        let _ = resolve_target(&controller(), &target);
    }
}
