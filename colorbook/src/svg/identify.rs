use crate::error::SvgError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Assign stable ids to every fillable region of an SVG document.
///
/// Regions are `<path>` elements (matched by local name, so `svg:path`
/// qualifies too). Each region's rank is its zero-based position among all
/// region elements in document order; a region without an `id` attribute
/// gets `id="path-{rank}"`, one that already carries an id is echoed
/// untouched. Everything else in the document passes through unchanged,
/// which makes the function idempotent: a second pass finds nothing to add.
pub fn identify(svg: &str) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut rank = 0usize;
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) if is_region(&e) => match assign_id(&e, &mut rank)? {
                Some(tagged) => writer.write_event(Event::Start(tagged))?,
                None => writer.write_event(Event::Start(e))?,
            },
            Event::Empty(e) if is_region(&e) => match assign_id(&e, &mut rank)? {
                Some(tagged) => writer.write_event(Event::Empty(tagged))?,
                None => writer.write_event(Event::Empty(e))?,
            },
            other => writer.write_event(other)?,
        }
    }
    String::from_utf8(writer.into_inner()).map_err(|_| SvgError::Encoding)
}

fn is_region(e: &BytesStart) -> bool {
    e.local_name().as_ref() == b"path"
}

/// Consume one rank slot; return a rewritten tag only when an id is missing.
fn assign_id(
    e: &BytesStart,
    rank: &mut usize,
) -> Result<Option<BytesStart<'static>>, SvgError> {
    let index = *rank;
    *rank += 1;
    if e.try_get_attribute("id")?.is_some() {
        return Ok(None);
    }
    let mut tagged = e.to_owned();
    tagged.push_attribute(("id", format!("path-{index}").as_str()));
    Ok(Some(tagged))
}
