use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of one fillable region inside an SVG document.
///
/// Generated ids have the form `path-{index}` where the index is the
/// region's zero-based rank among all `<path>` elements in document order.
pub type RegionId = String;

/// All fills a user has applied to one image: region id -> CSS color.
///
/// A BTreeMap so serialized snapshots are byte-stable; apply() itself never
/// depends on iteration order.
pub type LayerMap = BTreeMap<RegionId, String>;

/// An uploadable coloring page. `svg_content` is the raw markup as stored
/// by the backend (`svgContent` on the wire).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgImage {
    pub id: String,
    pub name: String,
    pub svg_content: String,
}

/// A curated set of colors, selection only. Immutable once fetched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorPalette {
    pub id: String,
    pub name: String,
    pub colors: Vec<String>,
}

/// Maximum colors per palette; extras are dropped at creation time.
pub const MAX_PALETTE_COLORS: usize = 10;

impl ColorPalette {
    /// Build a palette under the creation rules: duplicates collapse to
    /// their first occurrence, plain white is rejected (it matches the
    /// uncolored page background), and at most [`MAX_PALETTE_COLORS`]
    /// colors survive.
    pub fn curate(
        id: impl Into<String>,
        name: impl Into<String>,
        colors: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut kept: Vec<String> = Vec::new();
        for color in colors {
            let canon = color.trim().to_ascii_lowercase();
            if canon.is_empty() || canon == "#ffffff" {
                continue;
            }
            if !kept.contains(&canon) {
                kept.push(canon);
            }
            if kept.len() == MAX_PALETTE_COLORS {
                break;
            }
        }
        ColorPalette {
            id: id.into(),
            name: name.into(),
            colors: kept,
        }
    }
}

/// Durable progress for one (user, image) pair. `id` is assigned by the
/// backend on first create and is absent from the JSON until then.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub svg_id: String,
    #[serde(default)]
    pub layers: LayerMap,
}

impl ProgressRecord {
    /// A fresh record with no fills, used when the store has no progress yet.
    pub fn empty(user_id: impl Into<String>, svg_id: impl Into<String>) -> Self {
        ProgressRecord {
            id: None,
            user_id: user_id.into(),
            svg_id: svg_id.into(),
            layers: LayerMap::new(),
        }
    }
}

/// Profile keyed by the external identity provider's subject id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
