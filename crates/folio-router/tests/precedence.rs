//! Property tests for route resolution.

use folio_router::{MethodMap, PageMethod, Router};
use proptest::prelude::*;

fn literal_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

fn literal_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(literal_segment(), 0..4)
}

fn join(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        segments.iter().map(|s| format!("/{s}")).collect()
    }
}

proptest! {
    /// Every registered literal route resolves to itself, even when dynamic
    /// routes overlap it at every depth.
    #[test]
    fn literal_routes_always_resolve(paths in prop::collection::hash_set(literal_path(), 1..12)) {
        let mut router = Router::new();
        for path in &paths {
            router.insert(&join(path), MethodMap::new().get(join(path))).unwrap();
        }
        for depth in 1..4 {
            let dynamic: Vec<String> = (0..depth).map(|i| format!("{{p{i}}}")).collect();
            let _ = router.insert(&join(&dynamic), MethodMap::new().get("dynamic".to_string()));
        }
        let _ = router.insert("/*rest", MethodMap::new().get("catch-all".to_string()));

        for path in &paths {
            let path = join(path);
            let found = router.at(&path).expect("registered path must resolve");
            prop_assert_eq!(found.pattern, path.as_str());
            prop_assert_eq!(found.value.handler(PageMethod::Get), Some(&path));
        }
    }

    /// A method the page leaves unbound is never reported as supported.
    #[test]
    fn unbound_methods_stay_unsupported(segments in literal_path()) {
        let mut router = Router::new();
        let path = join(&segments);
        router.insert(&path, MethodMap::new().post(())).unwrap();

        let found = router.at(&path).unwrap();
        for method in PageMethod::ALL {
            prop_assert_eq!(found.value.supports(method), method == PageMethod::Post);
        }
    }
}
