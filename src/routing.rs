use log::debug;
use std::sync::Mutex;

/// Navigation collaborator: the piece of the hosting shell that owns the
/// current location. The auth flow reads its query parameters on entry and
/// rewrites them on mode changes without a reload.
pub trait Navigator: Send + Sync {
    fn path(&self) -> String;
    fn query(&self, key: &str) -> Option<String>;
    /// Replace the query string of the current location in place.
    fn replace_query(&self, query: &str);
    fn navigate(&self, path: &str);
}

struct Parts {
    path: String,
    query: String,
}

/// In-memory location bar used by the terminal shell and by tests.
pub struct Location {
    parts: Mutex<Parts>,
}

impl Location {
    pub fn new(path: &str, query: &str) -> Self {
        Location {
            parts: Mutex::new(Parts {
                path: path.to_string(),
                query: query.to_string(),
            }),
        }
    }

    /// The full location, `path` or `path?query`.
    pub fn href(&self) -> String {
        let parts = self.parts.lock().expect("location lock");
        if parts.query.is_empty() {
            parts.path.clone()
        } else {
            format!("{}?{}", parts.path, parts.query)
        }
    }
}

impl Navigator for Location {
    fn path(&self) -> String {
        self.parts.lock().expect("location lock").path.clone()
    }

    fn query(&self, key: &str) -> Option<String> {
        let parts = self.parts.lock().expect("location lock");
        for pair in parts.query.split('&') {
            let mut kv = pair.splitn(2, '=');
            if kv.next() == Some(key) {
                return Some(kv.next().unwrap_or("").to_string());
            }
        }
        None
    }

    fn replace_query(&self, query: &str) {
        let mut parts = self.parts.lock().expect("location lock");
        parts.query = query.to_string();
        debug!("location query replaced: {:?}", parts.query);
    }

    fn navigate(&self, path: &str) {
        let mut parts = self.parts.lock().expect("location lock");
        parts.path = path.to_string();
        parts.query.clear();
        debug!("navigated to {path}");
    }
}
