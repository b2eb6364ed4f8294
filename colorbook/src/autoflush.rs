use crate::session::EditSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Granularity of the shutdown check; keeps stop latency low without
/// waking the session lock more often than the flush interval allows.
const POLL_STEP: Duration = Duration::from_millis(50);

/// Background driver for the periodic flush.
///
/// Ticks a shared session and lets [`EditSession::maybe_flush`] decide
/// whether a write is due, so edits made while a flush is in flight are
/// picked up on the next tick. Dropping the handle stops the timer and
/// joins the thread: an in-flight flush completes, but nothing is written
/// after teardown.
pub struct AutoFlush {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AutoFlush {
    pub fn start(session: Arc<Mutex<EditSession>>) -> AutoFlush {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::spawn(move || loop {
            let mut waited = Duration::ZERO;
            let interval = match session.lock() {
                Ok(s) => s.flush_interval(),
                Err(_) => return,
            };
            while waited < interval {
                if flag.load(Ordering::Relaxed) {
                    return;
                }
                std::thread::sleep(POLL_STEP.min(interval - waited));
                waited += POLL_STEP;
            }
            if flag.load(Ordering::Relaxed) {
                return;
            }
            let Ok(mut s) = session.lock() else { return };
            if let Err(err) = s.maybe_flush(Instant::now()) {
                log::warn!("periodic flush skipped: {err}");
            }
        });
        AutoFlush {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AutoFlush {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SvgImage;
    use crate::store::{MemoryStore, ProgressStore};

    fn shared_session(store: Box<dyn ProgressStore>) -> Arc<Mutex<EditSession>> {
        let mut s =
            EditSession::new("u1", store).with_flush_interval(Duration::from_millis(20));
        s.select_image(SvgImage {
            id: "img".into(),
            name: "img".into(),
            svg_content: "<svg><path/></svg>".into(),
        })
        .unwrap();
        Arc::new(Mutex::new(s))
    }

    #[test]
    fn flushes_in_the_background() {
        let store = Arc::new(MemoryStore::new());
        let session = shared_session(Box::new(SharedStore(Arc::clone(&store))));
        session.lock().unwrap().fill_region("path-0", "#f00").unwrap();

        let flusher = AutoFlush::start(Arc::clone(&session));
        let deadline = Instant::now() + Duration::from_secs(2);
        while store.records().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        flusher.stop();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].layers.get("path-0").map(String::as_str),
            Some("#f00")
        );
    }

    #[test]
    fn stop_prevents_later_writes() {
        let store = Arc::new(MemoryStore::new());
        let session = shared_session(Box::new(SharedStore(Arc::clone(&store))));
        let flusher = AutoFlush::start(Arc::clone(&session));
        flusher.stop();

        session.lock().unwrap().fill_region("path-0", "#f00").unwrap();
        std::thread::sleep(Duration::from_millis(60));
        assert!(store.records().is_empty(), "no writes after teardown");
    }

    /// Store wrapper so tests can observe writes from the outside.
    struct SharedStore(Arc<MemoryStore>);

    impl ProgressStore for SharedStore {
        fn fetch(
            &self,
            user_id: &str,
            svg_id: &str,
        ) -> Result<crate::model::ProgressRecord, crate::error::StoreError> {
            self.0.fetch(user_id, svg_id)
        }
        fn list(
            &self,
            user_id: &str,
            svg_id: Option<&str>,
        ) -> Result<Vec<crate::model::ProgressRecord>, crate::error::StoreError> {
            self.0.list(user_id, svg_id)
        }
        fn create(
            &self,
            record: &crate::model::ProgressRecord,
        ) -> Result<String, crate::error::StoreError> {
            self.0.create(record)
        }
        fn update(
            &self,
            record: &crate::model::ProgressRecord,
        ) -> Result<(), crate::error::StoreError> {
            self.0.update(record)
        }
        fn delete(&self, id: &str) -> Result<(), crate::error::StoreError> {
            self.0.delete(id)
        }
    }
}
