use thiserror::Error;

/// Failures from the SVG identify/apply passes. Callers must keep the
/// original markup when one of these is returned; the engine never hands
/// back a partially rewritten document.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("malformed svg: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("svg output is not valid utf-8")]
    Encoding,
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Failures from a [`ProgressStore`](crate::store::ProgressStore).
///
/// `NotFound` is not an error condition for callers: missing progress means
/// "no progress yet" and degrades to an empty record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned status {status}")]
    Http { status: u16 },
    #[error("bad response body: {0}")]
    Decode(String),
}

/// Failures from session operations that cannot degrade locally.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no image selected")]
    NoImage,
    #[error(transparent)]
    Svg(#[from] SvgError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
