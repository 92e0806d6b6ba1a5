use regex::Regex;

use crate::models::{ExtractedReferences, Reference, ReferenceKind};

/// Pulls link targets out of markdown text.
///
/// This is a pair of pattern matchers, not a markdown parser. Matching is
/// non-greedy and single-pass: the first `]]` or `)` closes a link, nested
/// brackets are not understood, and `.` never crosses a newline. Malformed or
/// unterminated syntax simply does not match.
///
/// # Fields
///
/// - `wiki_link_pattern`: `[[target]]` and `[[target|display]]`
///   - Pattern: `\[\[(.*?)(?:\|(.*?))?\]\]`
///   - Example match: "\[\[Other Note|see here\]\]" captures "Other Note"
///
/// - `image_pattern`: `![alt](url)`
///   - Pattern: `!\[(.*?)\]\((.*?)\)`
///
/// - `link_pattern`: `[text](url)` where the `[` is not preceded by `!`
///   - Pattern: `\[(.*?)\]\((.*?)\)` plus a look-behind check done in code,
///     since the regex crate has no look-around
pub struct ReferenceExtractor {
    wiki_link_pattern: Regex,
    image_pattern: Regex,
    link_pattern: Regex,
}

impl ReferenceExtractor {
    /// Create a new ReferenceExtractor with compiled regex patterns
    pub fn new() -> Self {
        Self {
            wiki_link_pattern: Regex::new(r"\[\[(.*?)(?:\|(.*?))?\]\]")
                .expect("Invalid wiki-link regex"),
            image_pattern: Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid image regex"),
            link_pattern: Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link regex"),
        }
    }

    /// Run both matcher families over a document.
    pub fn extract(&self, content: &str) -> ExtractedReferences {
        let references = ExtractedReferences {
            wiki_links: self.wiki_links(content),
            markdown_links: self.markdown_links(content),
        };

        tracing::debug!(
            "Extracted {} wiki-links and {} markdown links",
            references.wiki_links.len(),
            references.markdown_links.len()
        );

        references
    }

    /// Wiki-link targets in source order, duplicates kept.
    pub fn wiki_links(&self, content: &str) -> Vec<Reference> {
        self.wiki_link_pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let target = caps.get(1)?;
                let mut reference =
                    Reference::new(target.as_str(), ReferenceKind::WikiLink, whole.start());
                if let Some(display) = caps.get(2) {
                    reference = reference.with_display(display.as_str());
                }
                Some(reference)
            })
            .collect()
    }

    /// Image and plain-link urls, merged by position in the source.
    ///
    /// The two passes are independent, so text such as `![a [b](c)` yields
    /// `c` from both the image and the link matcher.
    pub fn markdown_links(&self, content: &str) -> Vec<Reference> {
        let mut references = self.images(content);
        references.extend(self.plain_links(content));
        // stable: an image and a link never share a start offset
        references.sort_by_key(|r| r.offset);
        references
    }

    /// `![alt](url)` urls in source order.
    pub fn images(&self, content: &str) -> Vec<Reference> {
        self.image_pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let url = caps.get(2)?;
                let alt = caps.get(1)?;
                Some(
                    Reference::new(url.as_str(), ReferenceKind::Image, whole.start())
                        .with_display(alt.as_str()),
                )
            })
            .collect()
    }

    /// `[text](url)` urls in source order, skipping any `[` right after `!`.
    pub fn plain_links(&self, content: &str) -> Vec<Reference> {
        let bytes = content.as_bytes();
        let mut references = Vec::new();
        let mut pos = 0;

        while pos <= content.len() {
            let Some(caps) = self.link_pattern.captures_at(content, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            if whole.start() > 0 && bytes[whole.start() - 1] == b'!' {
                // `[` is ASCII, so start + 1 is a char boundary
                pos = whole.start() + 1;
                continue;
            }

            if let (Some(text), Some(url)) = (caps.get(1), caps.get(2)) {
                references.push(
                    Reference::new(url.as_str(), ReferenceKind::Link, whole.start())
                        .with_display(text.as_str()),
                );
            }
            pos = whole.end();
        }

        references
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}
