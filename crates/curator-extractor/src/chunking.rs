//! Fixed-size overlapping text windows

use crate::config::ChunkConfig;
use crate::error::ExtractorError;

/// Splits text into overlapping windows of a fixed character count
///
/// Window `k` starts at `k * (size - overlap)`; the last window may be
/// shorter. Offsets count `char`s, never bytes.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a chunker, rejecting geometry that could never advance
    pub fn new(config: ChunkConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { config })
    }

    /// Chunker with the default 500/50 geometry
    pub fn default_config() -> Self {
        Self {
            config: ChunkConfig::default(),
        }
    }

    /// Window geometry in use
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk the given text
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let stride = self.config.stride();
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.config.size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += stride;
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkConfig { size, overlap }).unwrap()
    }

    #[test]
    fn test_empty_text() {
        assert!(Chunker::default().chunk("").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = Chunker::default().chunk("Полис ОСАГО");
        assert_eq!(chunks, vec!["Полис ОСАГО".to_string()]);
    }

    #[test]
    fn test_exact_window_is_single_chunk() {
        let text = "a".repeat(500);
        assert_eq!(Chunker::default().chunk(&text).len(), 1);
    }

    #[test]
    fn test_window_starts_follow_stride() {
        let text: String = (0..1000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = Chunker::default().chunk(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1], text[450..950]);
        assert_eq!(chunks[2], text[900..1000]);
    }

    #[test]
    fn test_overlap_is_shared_with_predecessor() {
        let chunker = small(10, 3);
        let chunks = chunker.chunk("abcdefghijklmnop");
        assert_eq!(chunks, vec!["abcdefghij", "hijklmnop"]);
        assert!(chunks[0].ends_with(&chunks[1][..3]));
    }

    #[test]
    fn test_cyrillic_is_counted_in_chars() {
        let text = "страхование".repeat(100);
        let chunks = Chunker::default().chunk(&text);
        assert_eq!(chunks[0].chars().count(), 500);
    }

    #[test]
    fn test_concatenation_duplicates_overlaps() {
        let chunker = small(10, 3);
        let text = "abcdefghijklmnop";
        let joined: String = chunker.chunk(text).concat();
        // "hij" appears twice: once at the end of chunk 0, once at the start of chunk 1
        assert_eq!(joined, "abcdefghijhijklmnop");
        assert_eq!(joined.len(), text.len() + 3);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        assert!(Chunker::new(ChunkConfig { size: 5, overlap: 5 }).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: dropping each chunk's overlap prefix rebuilds the text
        #[test]
        fn test_chunks_cover_text(text in "[a-zа-я ]{0,2000}") {
            let chunker = Chunker::default();
            let chunks = chunker.chunk(&text);
            let overlap = chunker.config().overlap;

            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                if i == 0 {
                    rebuilt.push_str(chunk);
                } else {
                    rebuilt.extend(chunk.chars().skip(overlap));
                }
            }
            prop_assert_eq!(rebuilt, text);
        }

        /// Property: no window exceeds the configured size
        #[test]
        fn test_chunk_size_bound(text in ".{0,1500}") {
            let chunker = Chunker::default();
            for chunk in chunker.chunk(&text) {
                prop_assert!(chunk.chars().count() <= chunker.config().size);
            }
        }
    }
}
