use url::Url;

/// URLs discovered during the current round, waiting to be merged into the
/// site map
///
/// Order of discovery is preserved. The frontier is drained at the end of
/// every round and never carries URLs across rounds.
#[derive(Debug, Default)]
pub struct Frontier {
    urls: Vec<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a discovered URL; duplicates are resolved by the site map
    pub fn push(&mut self, url: Url) {
        self.urls.push(url);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Takes every queued URL, leaving the frontier empty
    pub fn drain(&mut self) -> std::vec::Drain<'_, Url> {
        self.urls.drain(..)
    }
}
