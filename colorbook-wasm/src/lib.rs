use colorbook::{EditSession, MemoryStore};
use wasm_bindgen::prelude::*;

mod api;
mod error;

/// One user's coloring session. The JS host owns REST persistence (the
/// browser app already talks to the backend); the wasm side keeps the
/// engine state and exposes the layer map for the host to save.
#[wasm_bindgen]
pub struct Session {
    pub(crate) inner: EditSession,
}

impl Session {
    pub fn rs_new(user_id: String) -> Session {
        Session {
            inner: EditSession::new(user_id, Box::new(MemoryStore::new())),
        }
    }
}
