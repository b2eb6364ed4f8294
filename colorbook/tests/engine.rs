use colorbook::{apply, identify, LayerMap};

fn layers(pairs: &[(&str, &str)]) -> LayerMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const THREE_PATHS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
  <path d="M0 0 L1 0 L1 1 Z"/>
  <path d="M2 0 L3 0 L3 1 Z"/>
  <path d="M4 0 L5 0 L5 1 Z"/>
</svg>"#;

#[test]
fn three_unidentified_paths_get_sequential_ids() {
    let out = identify(THREE_PATHS).unwrap();
    for id in ["path-0", "path-1", "path-2"] {
        assert!(out.contains(&format!(r#"id="{id}""#)), "missing {id}");
    }
    assert!(!out.contains("path-3"));
}

#[test]
fn identify_twice_equals_identify_once() {
    let once = identify(THREE_PATHS).unwrap();
    assert_eq!(identify(&once).unwrap(), once);
}

#[test]
fn apply_styles_only_the_second_path() {
    let identified = identify(THREE_PATHS).unwrap();
    let out = apply(&identified, &layers(&[("path-1", "#00ff00")])).unwrap();
    assert!(out.contains(r#"id="path-1" style="fill:#00ff00""#));
    assert!(!out.contains(r#"id="path-0" style"#));
    assert!(!out.contains(r#"id="path-2" style"#));
}

#[test]
fn apply_is_deterministic_across_calls() {
    let identified = identify(THREE_PATHS).unwrap();
    let m = layers(&[("path-0", "#111"), ("path-2", "#333")]);
    assert_eq!(apply(&identified, &m).unwrap(), apply(&identified, &m).unwrap());
}

#[test]
fn apply_tolerates_ids_from_a_stale_map() {
    let identified = identify(THREE_PATHS).unwrap();
    let current = layers(&[("path-0", "#111")]);
    let stale = layers(&[("path-0", "#111"), ("path-7", "#999"), ("removed-region", "#000")]);
    assert_eq!(
        apply(&identified, &current).unwrap(),
        apply(&identified, &stale).unwrap()
    );
}

#[test]
fn round_trip_touches_exactly_one_region() {
    let identified = identify(THREE_PATHS).unwrap();
    let colored = apply(&identified, &layers(&[("path-2", "#abcdef")])).unwrap();
    // The other two paths must be byte-identical to the identified form.
    for line in identified.lines() {
        if line.contains("path-0") || line.contains("path-1") {
            assert!(colored.contains(line), "untouched region changed: {line}");
        }
    }
    assert!(colored.contains(r#"id="path-2" style="fill:#abcdef""#));
}

#[test]
fn comments_doctype_and_text_survive_both_passes() {
    let svg = "<?xml version=\"1.0\"?>\n<!-- a coloring page -->\n<svg><title>Cat</title><path/></svg>";
    let identified = identify(svg).unwrap();
    assert!(identified.contains("<!-- a coloring page -->"));
    assert!(identified.contains("<title>Cat</title>"));
    let colored = apply(&identified, &layers(&[("path-0", "#fed")])).unwrap();
    assert!(colored.contains("<!-- a coloring page -->"));
    assert!(colored.contains("<title>Cat</title>"));
}

#[test]
fn malformed_documents_fail_without_output() {
    for bad in ["<svg></oops>", "<svg><path d='x'></svg>", "<svg><g><path/></svg>"] {
        assert!(identify(bad).is_err(), "accepted: {bad}");
        assert!(apply(bad, &LayerMap::new()).is_err(), "accepted: {bad}");
    }
}
