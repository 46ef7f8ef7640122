use serde::Deserialize;
use serde::Serialize;

/// A header-delimited region of the source corpus.
///
/// Sections exist only during index construction: the corpus text is split
/// on level-2 headers, each section is chunked independently, and the
/// section itself is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text with marker characters stripped; empty for any preamble
    /// before the first header
    pub title: String,
    /// Raw section text, including the header line
    pub content: String,
}

/// Metadata carried alongside every indexed chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub section_title: String,
    pub section_index: usize,
    pub chunk_index: usize,
    /// Unique key of the form `section_{section_index}_chunk_{chunk_index}`
    pub id: String,
}

impl ChunkMetadata {
    pub fn new(section_title: &str, section_index: usize, chunk_index: usize) -> Self {
        Self {
            section_title: section_title.to_string(),
            section_index,
            chunk_index,
            id: format!("section_{section_index}_chunk_{chunk_index}"),
        }
    }
}

/// A chunk retrieved for a query, with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_metadata_id_format() {
        let meta = ChunkMetadata::new("Experience", 2, 5);
        assert_eq!(meta.id, "section_2_chunk_5");
        assert_eq!(meta.section_title, "Experience");
    }
}
