//! Section splitting and overlapping-window chunking for the corpus text.
//!
//! The corpus is a markdown-ish document where level-2 headers (`##`)
//! delimit sections and deeper headers are ordinary content. Each section is
//! chunked independently, so no chunk ever spans a section boundary.

use crate::models::Section;

/// Split corpus text into sections on level-2 header lines.
///
/// A line is a header iff it starts with exactly `##` (not `###` or
/// deeper). Encountering a header flushes the accumulated section when its
/// trimmed content is non-empty; text before the first header becomes a
/// section with an empty title.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title = String::new();
    let mut current_content = String::new();

    for line in text.lines() {
        if line.starts_with("##") && !line.starts_with("###") {
            if !current_content.trim().is_empty() {
                sections.push(Section {
                    title: current_title.clone(),
                    content: current_content.trim().to_string(),
                });
            }

            current_title = line.trim_start_matches('#').trim().to_string();
            current_content = format!("{line}\n");
        } else {
            current_content.push_str(line);
            current_content.push('\n');
        }
    }

    if !current_content.trim().is_empty() {
        sections.push(Section {
            title: current_title,
            content: current_content.trim().to_string(),
        });
    }

    sections
}

/// Split text into overlapping chunks of at most `chunk_size` bytes.
///
/// Windows are shrunk to the last sentence boundary (`.` or newline,
/// whichever comes later) when that boundary falls in the latter half of
/// the window, so chunks tend to end on complete sentences. Consecutive
/// chunks overlap by `overlap` bytes measured at the source positions.
/// Pure function of its inputs; assumes `overlap < chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(overlap < chunk_size, "overlap must be smaller than chunk_size");

    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // The nominal end may run past the text; only the slice is clamped.
        // Advancing from the unclamped end is what terminates the loop once
        // the final window has been emitted.
        let mut end = start + chunk_size;
        let mut slice_end = snap_to_char_boundary(text, end.min(text.len()));

        // Try to break at a sentence boundary, searching the window only
        if end < text.len() {
            let window = &text[start..slice_end];
            let last_period = window.rfind('.');
            let last_newline = window.rfind('\n');

            if let Some(rel) = last_period.max(last_newline) {
                let break_point = start + rel;
                if break_point > start + chunk_size / 2 {
                    // Both delimiters are single-byte, so +1 stays on a
                    // char boundary
                    end = break_point + 1;
                    slice_end = end;
                }
            }
        }

        chunks.push(text[start..slice_end].trim().to_string());
        start = snap_to_char_boundary(text, end.saturating_sub(overlap));
    }

    chunks
}

/// Snap a byte index back to the nearest valid UTF-8 char boundary.
fn snap_to_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Hello, world!", 1000, 200);
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_text_exactly_chunk_size_is_not_split() {
        let text = "a".repeat(100);
        let chunks = chunk_text(&text, 100, 20);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let text = "word ".repeat(200);
        let chunks = chunk_text(&text, 100, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 100, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_sentence_boundary_shrink() {
        // A period well past the window midpoint: the first chunk should
        // end right after it instead of at the raw boundary
        let text = format!("{}. {}", "a".repeat(80), "b".repeat(100));
        let chunks = chunk_text(&text, 100, 10);
        assert_eq!(chunks[0], format!("{}.", "a".repeat(80)));
    }

    #[test]
    fn test_early_period_does_not_shrink() {
        // A period before the midpoint must not shorten the window
        let text = format!("{}. {}", "a".repeat(10), "b".repeat(200));
        let chunks = chunk_text(&text, 100, 10);
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        // No sentence delimiters, so windows are never shrunk and the
        // overlap is exact at source positions
        let text: String = ('a'..='z').cycle().take(250).collect();
        let chunks = chunk_text(&text, 100, 20);
        for pair in chunks.windows(2) {
            let suffix = &pair[0][pair[0].len() - 20..];
            assert!(pair[1].starts_with(suffix));
        }
    }

    #[test]
    fn test_coverage_reconstructs_source() {
        let text: String = ('a'..='z').cycle().take(300).collect();
        let chunks = chunk_text(&text, 100, 20);
        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.push_str(&chunk[20..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_deterministic() {
        let text = "The quick brown fox. ".repeat(30);
        let a = chunk_text(&text, 120, 30);
        let b = chunk_text(&text, 120, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let text = "héllo wörld. ".repeat(50);
        let chunks = chunk_text(&text, 64, 16);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_split_sections_basic() {
        let text = "## Experience\nI built X.\n\n## Skills\nI know Y.\n";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Experience");
        assert!(sections[0].content.contains("I built X."));
        assert_eq!(sections[1].title, "Skills");
        assert!(sections[1].content.contains("I know Y."));
    }

    #[test]
    fn test_level_three_headers_are_content() {
        let text = "## Projects\n### Side project\ndetails\n";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.contains("### Side project"));
    }

    #[test]
    fn test_preamble_gets_empty_title() {
        let text = "intro line\n\n## First\ncontent\n";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "");
        assert!(sections[0].content.contains("intro line"));
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(split_sections("").is_empty());
        assert!(split_sections("   \n  \n").is_empty());
    }

    #[test]
    fn test_header_line_kept_in_content() {
        let text = "## About\nhello\n";
        let sections = split_sections(text);
        assert!(sections[0].content.starts_with("## About"));
    }
}
