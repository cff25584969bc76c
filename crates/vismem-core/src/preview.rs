//! Filename-keyed cache of displayable previews (data URIs).
//!
//! Five independent operations read and write this cache (list load,
//! search, upload, local preview generation, delete). The single rule
//! they all obey is the no-downgrade merge: once a real image is cached
//! for a filename, no placeholder ever replaces it.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Where a preview's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    /// Decoded from bytes the backend embedded inline.
    Remote,
    /// Read from a file the user selected for upload this session.
    Local,
    /// Synthesized stand-in; fills the gap until real data arrives.
    Placeholder,
}

impl PreviewSource {
    pub fn is_real(self) -> bool {
        !matches!(self, Self::Placeholder)
    }
}

/// A displayable image reference: always a `data:` URI.
#[derive(Debug, Clone)]
pub struct Preview {
    pub source: PreviewSource,
    pub data_uri: String,
}

#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<String, Preview>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<&Preview> {
        self.entries.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a real-image preview. Fills a vacancy or upgrades a
    /// placeholder; an existing real image is left alone (first real
    /// entry wins). Returns whether the cache changed.
    pub fn insert_image(
        &mut self,
        filename: &str,
        source: PreviewSource,
        data_uri: String,
    ) -> bool {
        debug_assert!(source.is_real());
        match self.entries.get(filename) {
            Some(existing) if existing.source.is_real() => false,
            _ => {
                self.entries
                    .insert(filename.to_string(), Preview { source, data_uri });
                true
            }
        }
    }

    /// Insert a placeholder, but only into a vacancy: placeholders never
    /// replace anything, real or otherwise.
    pub fn insert_placeholder(&mut self, filename: &str, data_uri: String) -> bool {
        if self.entries.contains_key(filename) {
            return false;
        }
        self.entries.insert(
            filename.to_string(),
            Preview {
                source: PreviewSource::Placeholder,
                data_uri,
            },
        );
        true
    }

    pub fn remove(&mut self, filename: &str) -> Option<Preview> {
        self.entries.remove(filename)
    }

    /// Filename → source map, cheap enough to clone into view snapshots.
    pub fn sources(&self) -> HashMap<String, PreviewSource> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.source))
            .collect()
    }
}

/// Data URI for backend-embedded image bytes. The backend stores
/// screenshots re-encoded as JPEG, so the base64 payload is passed
/// through under that content type.
pub fn remote_data_uri(base64_image: &str) -> String {
    format!("data:image/jpeg;base64,{base64_image}")
}

/// Data URI for raw local file bytes.
pub fn local_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_fills_vacancy_only() {
        let mut cache = PreviewCache::new();
        assert!(cache.insert_placeholder("a.png", "data:p1".into()));
        assert!(!cache.insert_placeholder("a.png", "data:p2".into()));
        assert_eq!(cache.get("a.png").unwrap().data_uri, "data:p1");
    }

    #[test]
    fn test_real_image_upgrades_placeholder() {
        let mut cache = PreviewCache::new();
        cache.insert_placeholder("a.png", "data:p".into());
        assert!(cache.insert_image("a.png", PreviewSource::Remote, "data:r".into()));
        let preview = cache.get("a.png").unwrap();
        assert_eq!(preview.source, PreviewSource::Remote);
        assert_eq!(preview.data_uri, "data:r");
    }

    #[test]
    fn test_no_downgrade_after_real_image() {
        let mut cache = PreviewCache::new();
        cache.insert_image("a.png", PreviewSource::Remote, "data:r".into());
        assert!(!cache.insert_placeholder("a.png", "data:p".into()));
        assert_eq!(cache.get("a.png").unwrap().source, PreviewSource::Remote);
    }

    #[test]
    fn test_first_real_image_wins() {
        let mut cache = PreviewCache::new();
        cache.insert_image("a.png", PreviewSource::Local, "data:local".into());
        assert!(!cache.insert_image("a.png", PreviewSource::Remote, "data:remote".into()));
        assert_eq!(cache.get("a.png").unwrap().source, PreviewSource::Local);
    }

    #[test]
    fn test_remove_clears_entry() {
        let mut cache = PreviewCache::new();
        cache.insert_placeholder("a.png", "data:p".into());
        assert!(cache.remove("a.png").is_some());
        assert!(!cache.contains("a.png"));
        assert!(cache.remove("a.png").is_none());
    }

    #[test]
    fn test_local_data_uri_encodes_bytes() {
        let uri = local_data_uri("image/png", b"hello");
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_remote_data_uri_shape() {
        assert_eq!(remote_data_uri("Zm9v"), "data:image/jpeg;base64,Zm9v");
    }
}
