use serde_json::json;
use std::thread;

use crate::helpers::test_utils::{config_for, crossref_content, write_tree};
use crossref_index::{lookup_merging, lookup_single_symbol, Crossrefs, LookupError, Registry};

fn sample_registry() -> (tempfile::TempDir, Registry) {
    let tree = write_tree(&crossref_content(&[
        ("A", json!({"calls": [{"path": "a.cpp", "lno": 1}], "defs": [{"path": "a.h"}]})),
        ("B", json!({"calls": [{"path": "b.cpp", "lno": 2}]})),
        ("empty", json!({})),
    ]));
    let registry = Registry::load(&config_for(&[("mc", tree.path())]));
    (tree, registry)
}

#[test]
fn test_single_merge_equals_single_lookup() {
    let (_tree, registry) = sample_registry();

    let single = lookup_single_symbol(&registry, "mc", "A").unwrap().unwrap();
    let merged = lookup_merging(&registry, "mc", "A").unwrap();
    assert_eq!(merged, single);
}

#[test]
fn test_merge_order_follows_request() {
    let (_tree, registry) = sample_registry();
    let r1 = json!({"path": "a.cpp", "lno": 1});
    let r2 = json!({"path": "b.cpp", "lno": 2});

    let ab = lookup_merging(&registry, "mc", "A,B").unwrap();
    assert_eq!(ab["calls"], json!([r1.clone(), r2.clone()]));
    assert_eq!(ab["defs"], json!([{"path": "a.h"}]));

    let ba = lookup_merging(&registry, "mc", "B,A").unwrap();
    assert_eq!(ba["calls"], json!([r2, r1]));
}

#[test]
fn test_merge_is_all_or_nothing() {
    let (_tree, registry) = sample_registry();

    assert!(lookup_merging(&registry, "mc", "A,missing,B").unwrap().is_empty());
    assert!(lookup_merging(&registry, "mc", "missing").unwrap().is_empty());
    assert!(lookup_merging(&registry, "mc", "A,B,").unwrap().is_empty());
}

#[test]
fn test_not_found_differs_from_empty_payload() {
    let (_tree, registry) = sample_registry();

    assert_eq!(
        lookup_single_symbol(&registry, "mc", "empty").unwrap(),
        Some(Crossrefs::new())
    );
    assert_eq!(lookup_single_symbol(&registry, "mc", "absent").unwrap(), None);
}

#[test]
fn test_definition_payloads_round_trip_and_merge() {
    let foo = json!({
        "defs": [{"path": "dom/Foo.h", "lines": [{"lno": 10, "line": "class Foo {"}]}],
        "uses": [{"path": "dom/Foo.cpp", "lines": [{"lno": 3}]}],
        "consumes": [{"sym": "_ZN3BarC1Ev", "pretty": "Bar::Bar", "syntax": "constructor"}],
        "meta": {"syntax": "class", "type": "", "typesym": "", "srcsym": "", "targetsym": "", "idlsym": ""}
    });
    let bar = json!({
        "defs": [{"path": "dom/Bar.h", "lines": [{"lno": 4}]}],
        "meta": {"syntax": "function", "type": "void ()", "typesym": "", "srcsym": "", "targetsym": "", "idlsym": ""}
    });
    let tree = write_tree(&crossref_content(&[("Foo", foo.clone()), ("Bar", bar.clone())]));
    let registry = Registry::load(&config_for(&[("mc", tree.path())]));

    let found = lookup_single_symbol(&registry, "mc", "Foo").unwrap().unwrap();
    assert_eq!(serde_json::Value::Object(found), foo);

    let merged = lookup_merging(&registry, "mc", "Foo,Bar").unwrap();
    assert_eq!(merged["defs"], json!([foo["defs"][0], bar["defs"][0]]));
    assert_eq!(merged["uses"], foo["uses"]);
    assert_eq!(merged["meta"], foo["meta"]);

    let reversed = lookup_merging(&registry, "mc", "Bar,Foo").unwrap();
    assert_eq!(reversed["meta"], bar["meta"]);
}

#[test]
fn test_malformed_payload_surfaces_as_error() {
    let tree = write_tree("good\n{\"calls\":[]}\nbroken\n{\"calls\": [1,\n");
    let registry = Registry::load(&config_for(&[("t", tree.path())]));

    let err = lookup_single_symbol(&registry, "t", "broken").unwrap_err();
    assert!(matches!(err, LookupError::MalformedPayload { .. }));
    assert!(matches!(
        lookup_merging(&registry, "t", "good,broken"),
        Err(LookupError::MalformedPayload { .. })
    ));
}

#[test]
fn test_unknown_tree() {
    let (_tree, registry) = sample_registry();
    assert!(matches!(
        lookup_single_symbol(&registry, "comm-central", "A"),
        Err(LookupError::UnknownTree(_))
    ));
}

#[test]
fn test_concurrent_lookups() {
    let (_tree, registry) = sample_registry();
    let expected = lookup_merging(&registry, "mc", "A,B").unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..200 {
                    assert_eq!(lookup_merging(&registry, "mc", "A,B").unwrap(), expected);
                    assert!(lookup_single_symbol(&registry, "mc", "absent").unwrap().is_none());
                }
            });
        }
    });
}
