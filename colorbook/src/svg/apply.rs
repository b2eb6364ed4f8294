use crate::error::SvgError;
use crate::model::LayerMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Reapply a user's fills onto an identified SVG document.
///
/// Every element whose `id` attribute is a key in `layers` has its `style`
/// attribute replaced with `fill:{color}`; all other markup is echoed
/// unchanged. Ids in the map with no matching element are ignored, which
/// tolerates progress saved against an image that was later edited
/// upstream. Elements without ids can never match, so a document that
/// skipped [`identify`](crate::svg::identify::identify) renders unfilled
/// rather than failing.
///
/// Output is a function of `(svg, layers)` only: each element's final fill
/// comes from a single lookup of its own id, so map iteration order cannot
/// influence the result.
pub fn apply(svg: &str, layers: &LayerMap) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => match fill_color(&e, layers)? {
                Some(color) => writer.write_event(Event::Start(restyle(&e, color)?))?,
                None => writer.write_event(Event::Start(e))?,
            },
            Event::Empty(e) => match fill_color(&e, layers)? {
                Some(color) => writer.write_event(Event::Empty(restyle(&e, color)?))?,
                None => writer.write_event(Event::Empty(e))?,
            },
            other => writer.write_event(other)?,
        }
    }
    String::from_utf8(writer.into_inner()).map_err(|_| SvgError::Encoding)
}

/// Look up the element's id in the layer map. Ids are compared literally,
/// matching how the generated `path-{n}` ids are produced.
fn fill_color<'m>(e: &BytesStart, layers: &'m LayerMap) -> Result<Option<&'m str>, SvgError> {
    match e.try_get_attribute("id")? {
        Some(attr) => {
            let id = String::from_utf8_lossy(attr.value.as_ref());
            Ok(layers.get(id.as_ref()).map(String::as_str))
        }
        None => Ok(None),
    }
}

/// Rebuild the tag with its `style` attribute set to the fill. Any previous
/// style is dropped wholesale, not merged.
fn restyle(e: &BytesStart, color: &str) -> Result<BytesStart<'static>, SvgError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() != b"style" {
            out.push_attribute(attr);
        }
    }
    out.push_attribute(("style", format!("fill:{color}").as_str()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::identify::identify;

    fn layers(pairs: &[(&str, &str)]) -> LayerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fills_only_the_matching_region() {
        let svg = identify(r#"<svg><path d="a"/><path d="b"/><path d="c"/></svg>"#).unwrap();
        let out = apply(&svg, &layers(&[("path-1", "#00ff00")])).unwrap();
        assert!(out.contains(r#"<path d="a" id="path-0"/>"#));
        assert!(out.contains(r#"<path d="b" id="path-1" style="fill:#00ff00"/>"#));
        assert!(out.contains(r#"<path d="c" id="path-2"/>"#));
    }

    #[test]
    fn replaces_an_existing_style() {
        let svg = r#"<svg><path id="path-0" style="fill:#000;stroke:red"/></svg>"#;
        let out = apply(svg, &layers(&[("path-0", "#abc123")])).unwrap();
        assert!(out.contains(r#"style="fill:#abc123""#));
        assert!(!out.contains("stroke:red"));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let svg = identify(r#"<svg><path/></svg>"#).unwrap();
        let sparse = apply(&svg, &layers(&[("path-0", "#111111")])).unwrap();
        let with_stale = apply(
            &svg,
            &layers(&[("path-0", "#111111"), ("path-99", "#222222"), ("ghost", "#333333")]),
        )
        .unwrap();
        assert_eq!(sparse, with_stale);
    }

    #[test]
    fn empty_map_is_identity() {
        let svg = identify(r#"<svg><g><path/><path/></g></svg>"#).unwrap();
        assert_eq!(apply(&svg, &LayerMap::new()).unwrap(), svg);
    }

    #[test]
    fn unidentified_regions_are_skipped() {
        let svg = r#"<svg><path d="never-identified"/></svg>"#;
        let out = apply(svg, &layers(&[("path-0", "#f00")])).unwrap();
        assert!(!out.contains("style"));
    }

    #[test]
    fn matches_any_element_by_id() {
        // getElementById semantics: a filled id on a group still matches.
        let svg = r#"<svg><g id="grp"><path id="path-0"/></g></svg>"#;
        let out = apply(svg, &layers(&[("grp", "#123456")])).unwrap();
        assert!(out.contains(r#"<g id="grp" style="fill:#123456">"#));
    }

    #[test]
    fn repeated_application_is_stable() {
        let svg = identify(r#"<svg><path/><path/></svg>"#).unwrap();
        let m = layers(&[("path-0", "#f00"), ("path-1", "#0f0")]);
        let once = apply(&svg, &m).unwrap();
        let again = apply(&once, &m).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn malformed_markup_is_rejected() {
        assert!(apply("<svg><g></svg>", &LayerMap::new()).is_err());
    }
}
