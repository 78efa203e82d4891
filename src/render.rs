//! Result area of the form: a loading indicator while captions are being
//! generated, otherwise the numbered caption list.

use std::io::{self, Write};

/// Text shown instead of the list while a request is outstanding
pub const LOADING_TEXT: &str = "Generating captions...";

/// Header printed when a new list is brought into view
pub const CAPTIONS_HEADER: &str = "=== Captions ===";

/// What the result area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionView<'a> {
    /// A request is in flight; previous captions are hidden
    Loading,
    /// The current list, possibly empty
    Captions(&'a [String]),
}

/// One rendering of the result area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub loading: bool,
    pub lines: Vec<String>,
    /// The list appeared or was replaced and should be scrolled to
    pub scroll_into_view: bool,
}

/// Formats a caption as a numbered line, counting from 1
pub fn format_caption(index: usize, caption: &str) -> String {
    format!("{}. {}", index + 1, caption)
}

#[derive(Debug, Default)]
pub struct ResultRenderer {
    last_generation: Option<u64>,
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `view` for the caption list identified by `generation`.
    ///
    /// A non-empty list is scrolled into view the first time its generation
    /// is rendered.
    pub fn render(&mut self, view: CaptionView<'_>, generation: u64) -> RenderFrame {
        match view {
            CaptionView::Loading => RenderFrame {
                loading: true,
                lines: vec![LOADING_TEXT.to_string()],
                scroll_into_view: false,
            },
            CaptionView::Captions(captions) => {
                let fresh = self.last_generation != Some(generation);
                self.last_generation = Some(generation);
                RenderFrame {
                    loading: false,
                    lines: captions
                        .iter()
                        .enumerate()
                        .map(|(i, caption)| format_caption(i, caption))
                        .collect(),
                    scroll_into_view: fresh && !captions.is_empty(),
                }
            }
        }
    }

    pub fn write_frame<W: Write>(&self, frame: &RenderFrame, out: &mut W) -> io::Result<()> {
        if frame.scroll_into_view {
            writeln!(out)?;
            writeln!(out, "{}", CAPTIONS_HEADER)?;
        }
        for line in &frame.lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numbered_lines_in_order() {
        let list = captions(&["A", "B"]);
        let mut renderer = ResultRenderer::new();
        let frame = renderer.render(CaptionView::Captions(&list), 1);

        assert_eq!(frame.lines, vec!["1. A", "2. B"]);
        assert!(!frame.loading);
    }

    #[test]
    fn test_loading_hides_list() {
        let mut renderer = ResultRenderer::new();
        let frame = renderer.render(CaptionView::Loading, 1);

        assert!(frame.loading);
        assert_eq!(frame.lines, vec![LOADING_TEXT]);
        assert!(!frame.scroll_into_view);
    }

    #[test]
    fn test_scrolls_once_per_generation() {
        let first = captions(&["one"]);
        let second = captions(&["one"]);
        let mut renderer = ResultRenderer::new();

        assert!(renderer.render(CaptionView::Captions(&first), 1).scroll_into_view);
        // Re-rendering the same list does not scroll again
        assert!(!renderer.render(CaptionView::Captions(&first), 1).scroll_into_view);
        // A replacement does, even with identical content
        assert!(renderer.render(CaptionView::Captions(&second), 2).scroll_into_view);
    }

    #[test]
    fn test_empty_list_never_scrolls() {
        let mut renderer = ResultRenderer::new();
        let frame = renderer.render(CaptionView::Captions(&[]), 3);
        assert!(frame.lines.is_empty());
        assert!(!frame.scroll_into_view);
    }

    #[test]
    fn test_write_frame_adds_header_when_scrolling() {
        let list = captions(&["Sunny days"]);
        let mut renderer = ResultRenderer::new();
        let frame = renderer.render(CaptionView::Captions(&list), 1);

        let mut out = Vec::new();
        renderer.write_frame(&frame, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("\n{}\n1. Sunny days\n", CAPTIONS_HEADER));
    }
}
