//! Scripted source adapter
//!
//! Replays a queue of canned results per URL. The last queued result repeats
//! once the queue is down to one, so "always fails" needs a single entry.

use playlog_scraper::{AdapterError, FetchRequest, RawEntry, SourceAdapter};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const SCRIPTED_TAG: &str = "scripted";

type Scripted = Result<Vec<RawEntry>, AdapterError>;

#[derive(Default)]
pub struct ScriptedAdapter {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one result for `url`
    pub fn push(&self, url: &str, result: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(result);
    }

    /// Replace everything queued for `url` with one repeating history
    pub fn set_history(&self, url: &str, entries: Vec<RawEntry>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), VecDeque::from([Ok(entries)]));
    }

    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn reset_attempts(&self) {
        self.attempts.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn name(&self) -> &'static str {
        SCRIPTED_TAG
    }

    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<Vec<RawEntry>, AdapterError> {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(request.url.to_string())
            .or_insert(0) += 1;

        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.entry(request.url.to_string()).or_default();
        match queue.len() {
            0 => Ok(Vec::new()),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap_or_else(|| Ok(Vec::new())),
        }
    }
}

pub fn fetch_error(url: &str) -> AdapterError {
    AdapterError::Fetch {
        url: url.to_string(),
        message: "connection refused".to_string(),
    }
}

pub fn parse_error(url: &str) -> AdapterError {
    AdapterError::Parse {
        url: url.to_string(),
        message: "expected value at line 1 column 1".to_string(),
    }
}
