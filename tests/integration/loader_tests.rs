use serde_json::json;

use crate::helpers::test_utils::{config_for, crossref_content, write_tree};
use crossref_index::index::BackingKind;
use crossref_index::{load, lookup_single_symbol, Crossrefs, IndexState, Registry};

#[test]
fn test_loads_every_pair() {
    let entries = vec![
        ("mozilla::dom::Element", json!({"uses": [{"path": "dom/Element.cpp", "lines": [{"lno": 12}]}]})),
        ("_ZN7mozilla3dom7ElementC1Ev", json!({"defs": [{"path": "dom/Element.h"}], "calls": []})),
        ("#define NS_OK", json!({})),
    ];
    let tree = write_tree(&crossref_content(&entries));

    let mut registry = Registry::new();
    load(&config_for(&[("mc", tree.path())]), &mut registry);

    let index = registry.get("mc").expect("tree installed");
    assert_eq!(index.state(), IndexState::Loaded);
    assert_eq!(index.backing(), BackingKind::Mmap);
    assert_eq!(index.len(), entries.len());

    let mut indexed: Vec<&str> = index.symbols().collect();
    indexed.sort_unstable();
    let mut written: Vec<&str> = entries.iter().map(|(symbol, _)| *symbol).collect();
    written.sort_unstable();
    assert_eq!(indexed, written);

    for (symbol, payload) in &entries {
        let expected: Crossrefs = serde_json::from_value(payload.clone()).unwrap();
        let found = lookup_single_symbol(&registry, "mc", symbol).unwrap();
        assert_eq!(found, Some(expected), "payload mismatch for {}", symbol);
    }
}

#[test]
fn test_empty_file_degrades_without_blocking_others() {
    let empty = write_tree("");
    let good = write_tree(&crossref_content(&[("foo", json!({"calls": [1]}))]));

    let registry = Registry::load(&config_for(&[("empty", empty.path()), ("good", good.path())]));

    assert_eq!(registry.len(), 2);

    let degraded = registry.get("empty").unwrap();
    assert_eq!(degraded.state(), IndexState::Degraded);
    assert_eq!(degraded.backing(), BackingKind::None);
    assert!(degraded.is_empty());
    assert!(lookup_single_symbol(&registry, "empty", "foo").unwrap().is_none());
    assert!(registry.lookup_merging("empty", "foo").unwrap().is_empty());

    assert_eq!(registry.get("good").unwrap().state(), IndexState::Loaded);
    assert!(lookup_single_symbol(&registry, "good", "foo").unwrap().is_some());
}

#[test]
fn test_missing_file_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::load(&config_for(&[("nofile", dir.path())]));

    let index = registry.get("nofile").unwrap();
    assert_eq!(index.state(), IndexState::Degraded);
    assert!(index.degraded_reason().is_some());
}

#[test]
fn test_dangling_trailing_key_is_dropped() {
    let mut content = crossref_content(&[("foo", json!({"calls": [1]}))]);
    content.push_str("orphan\n");
    let tree = write_tree(&content);

    let registry = Registry::load(&config_for(&[("t", tree.path())]));
    let index = registry.get("t").unwrap();

    assert_eq!(index.state(), IndexState::Loaded);
    assert_eq!(index.len(), 1);
    assert!(!index.contains("orphan"));
    assert!(lookup_single_symbol(&registry, "t", "orphan").unwrap().is_none());
}

#[test]
fn test_mmap_and_owned_buffers_agree() {
    let content = crossref_content(&[
        ("a", json!({"calls": [1, 2]})),
        ("b", json!({"defs": ["x"]})),
    ]);
    let tree = write_tree(&content);

    let mut config = config_for(&[("t", tree.path())]);
    let mapped = Registry::load(&config);
    config.index.use_mmap = false;
    let owned = Registry::load(&config);

    assert_eq!(owned.get("t").unwrap().backing(), BackingKind::Owned);
    for symbol in ["a", "b", "missing"] {
        assert_eq!(
            mapped.lookup_single_symbol("t", symbol).unwrap(),
            owned.lookup_single_symbol("t", symbol).unwrap()
        );
        assert_eq!(mapped.get("t").unwrap().span(symbol), owned.get("t").unwrap().span(symbol));
    }
}

#[test]
fn test_independent_registries() {
    let first = write_tree(&crossref_content(&[("only_in_first", json!({}))]));
    let second = write_tree(&crossref_content(&[("only_in_second", json!({}))]));

    let a = Registry::load(&config_for(&[("t", first.path())]));
    let b = Registry::load(&config_for(&[("t", second.path())]));

    assert!(a.lookup_single_symbol("t", "only_in_first").unwrap().is_some());
    assert!(a.lookup_single_symbol("t", "only_in_second").unwrap().is_none());
    assert!(b.lookup_single_symbol("t", "only_in_second").unwrap().is_some());
}
