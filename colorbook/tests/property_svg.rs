use colorbook::{apply, identify, LayerMap};
use proptest::prelude::*;

/// One building block of a synthetic coloring page.
#[derive(Clone, Debug)]
enum Block {
    Path,
    NamedPath(String),
    Rect,
    GroupedPath,
    Text(String),
}

fn block_strategy() -> impl Strategy<Value = Block> {
    prop_oneof![
        3 => Just(Block::Path),
        1 => "[a-z]{1,8}".prop_map(Block::NamedPath),
        1 => Just(Block::Rect),
        1 => Just(Block::GroupedPath),
        1 => "[a-zA-Z ]{0,12}".prop_map(Block::Text),
    ]
}

fn render(blocks: &[Block]) -> String {
    let mut out = String::from("<svg>");
    for b in blocks {
        match b {
            Block::Path => out.push_str(r#"<path d="M0 0 L1 1"/>"#),
            Block::NamedPath(name) => {
                out.push_str(&format!(r#"<path id="{name}" d="M0 0"/>"#))
            }
            Block::Rect => out.push_str(r#"<rect width="4" height="4"/>"#),
            Block::GroupedPath => out.push_str(r#"<g><path d="M1 0"/></g>"#),
            Block::Text(t) => out.push_str(&format!("<text>{t}</text>")),
        }
    }
    out.push_str("</svg>");
    out
}

fn region_count(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .filter(|b| matches!(b, Block::Path | Block::NamedPath(_) | Block::GroupedPath))
        .count()
}

fn color_strategy() -> impl Strategy<Value = String> {
    "#[0-9a-f]{6}"
}

proptest! {
    #[test]
    fn identify_is_idempotent(blocks in prop::collection::vec(block_strategy(), 0..20)) {
        let once = identify(&render(&blocks)).unwrap();
        prop_assert_eq!(identify(&once).unwrap(), once);
    }

    #[test]
    fn every_region_ends_up_identified(blocks in prop::collection::vec(block_strategy(), 0..20)) {
        let identified = identify(&render(&blocks)).unwrap();
        // Each generated region occupies one rank slot, so generated ids
        // never exceed the region count and never collide with each other.
        let total = region_count(&blocks);
        for rank in 0..total {
            let named_at_rank = matches!(blocks_region_at(&blocks, rank), Some(Block::NamedPath(_)));
            let has_generated = identified.contains(&format!(r#"id="path-{rank}""#));
            prop_assert_eq!(has_generated, !named_at_rank);
        }
        let has_id_beyond_total = identified.contains(&format!(r#"id="path-{total}""#));
        prop_assert!(!has_id_beyond_total);
    }

    #[test]
    fn apply_ignores_unknown_ids(
        blocks in prop::collection::vec(block_strategy(), 0..12),
        color in color_strategy(),
        stale in prop::collection::btree_map("[a-z]{4,10}", color_strategy(), 0..4),
    ) {
        let identified = identify(&render(&blocks)).unwrap();
        let mut m = LayerMap::new();
        if region_count(&blocks) > 0 {
            m.insert("path-0".into(), color);
        }
        let mut noisy = m.clone();
        for (k, v) in stale {
            // The dash keeps stale keys clear of both generated `path-{n}`
            // ids and the alphabetic NamedPath ids.
            noisy.entry(format!("zz-{k}")).or_insert(v);
        }
        prop_assert_eq!(apply(&identified, &m).unwrap(), apply(&identified, &noisy).unwrap());
    }

    #[test]
    fn apply_is_deterministic(
        blocks in prop::collection::vec(block_strategy(), 0..12),
        colors in prop::collection::vec(color_strategy(), 0..6),
    ) {
        let identified = identify(&render(&blocks)).unwrap();
        let m: LayerMap = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (format!("path-{i}"), c))
            .collect();
        let a = apply(&identified, &m).unwrap();
        prop_assert_eq!(apply(&identified, &m).unwrap(), a.clone());
        // And stable under re-application of the same map.
        prop_assert_eq!(apply(&a, &m).unwrap(), a);
    }
}

/// The region (rank'th fillable block) if any; groups contribute their
/// inner path.
fn blocks_region_at(blocks: &[Block], rank: usize) -> Option<&Block> {
    blocks
        .iter()
        .filter(|b| matches!(b, Block::Path | Block::NamedPath(_) | Block::GroupedPath))
        .nth(rank)
}
