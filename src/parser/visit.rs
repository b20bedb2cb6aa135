//! Event-stream traversal with an explicit visitor contract.
//!
//! `pulldown-cmark` yields a flat stream of `Start`/`End` pairs rather than
//! a tree. [`walk`] restores tree-style traversal on top of that stream: the
//! visitor decides per event whether to descend, prune the subtree, or stop.

use pulldown_cmark::{Event, Tag};
use std::ops::Range;

/// Instruction returned by a visitor for each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep walking, descending into the current node.
    Continue,
    /// For a `Start` event, skip every event up to and including its
    /// matching `End`. Equivalent to `Continue` for leaf events.
    SkipChildren,
    /// End the walk immediately.
    Stop,
}

/// Walk an offset-annotated event stream, calling `visitor` for each event
/// that is not inside a pruned subtree.
///
/// Returns `true` if the visitor stopped the walk early.
///
/// # Examples
///
/// ```
/// use pulldown_cmark::{Event, Parser, Tag};
/// use toctree::parser::visit::{Visit, walk};
///
/// let mut texts = Vec::new();
/// walk(Parser::new("para *one*\n\n# Title").into_offset_iter(), |event, _| {
///     match event {
///         Event::Start(Tag::Paragraph) => Visit::SkipChildren,
///         Event::Text(t) => {
///             texts.push(t.to_string());
///             Visit::Continue
///         }
///         _ => Visit::Continue,
///     }
/// });
/// assert_eq!(texts, ["Title"]);
/// ```
pub fn walk<'a, I, F>(events: I, mut visitor: F) -> bool
where
    I: IntoIterator<Item = (Event<'a>, Range<usize>)>,
    F: FnMut(&Event<'a>, &Range<usize>) -> Visit,
{
    // Depth inside a pruned subtree; zero when not skipping.
    let mut skip_depth = 0usize;

    for (event, range) in events {
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            continue;
        }

        match visitor(&event, &range) {
            Visit::Continue => {}
            Visit::SkipChildren => {
                if matches!(event, Event::Start(_)) {
                    skip_depth = 1;
                }
            }
            Visit::Stop => return true,
        }
    }

    false
}

/// Append the literal text an inline event contributes to a heading title.
///
/// Text and inline code contribute their content, line breaks a single space.
/// Math events and images are pruned; inline HTML and footnote markers add
/// nothing. Formatting containers (emphasis, strong, links) are descended
/// into so their text is kept.
pub fn push_inline_text(buf: &mut String, event: &Event<'_>) -> Visit {
    match event {
        Event::Text(text) | Event::Code(text) => {
            buf.push_str(text);
            Visit::Continue
        }
        Event::SoftBreak | Event::HardBreak => {
            buf.push(' ');
            Visit::Continue
        }
        Event::InlineMath(_) | Event::DisplayMath(_) => Visit::SkipChildren,
        Event::Start(Tag::Image { .. }) => Visit::SkipChildren,
        _ => Visit::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Options, Parser, TagEnd};

    fn events(md: &str) -> Vec<(Event<'_>, Range<usize>)> {
        Parser::new_ext(md, Options::ENABLE_MATH)
            .into_offset_iter()
            .collect()
    }

    #[test]
    fn test_continue_visits_everything() {
        let md = "# A\n\ntext";
        let total = events(md).len();
        let mut seen = 0;
        let stopped = walk(events(md), |_, _| {
            seen += 1;
            Visit::Continue
        });
        assert!(!stopped);
        assert_eq!(seen, total);
    }

    #[test]
    fn test_skip_children_prunes_until_matching_end() {
        let md = "> quoted **bold**\n>\n> # Inner\n\n# Outer";
        let mut texts = Vec::new();
        walk(events(md), |event, _| match event {
            Event::Start(Tag::BlockQuote(_)) => Visit::SkipChildren,
            Event::Text(t) => {
                texts.push(t.to_string());
                Visit::Continue
            }
            _ => Visit::Continue,
        });
        assert_eq!(texts, ["Outer"]);
    }

    #[test]
    fn test_skip_children_does_not_visit_matching_end() {
        let md = "para\n\n# H";
        let mut paragraph_ends = 0;
        walk(events(md), |event, _| match event {
            Event::Start(Tag::Paragraph) => Visit::SkipChildren,
            Event::End(TagEnd::Paragraph) => {
                paragraph_ends += 1;
                Visit::Continue
            }
            _ => Visit::Continue,
        });
        assert_eq!(paragraph_ends, 0);
    }

    #[test]
    fn test_stop_ends_walk() {
        let md = "# One\n\n# Two";
        let mut texts = Vec::new();
        let stopped = walk(events(md), |event, _| {
            if let Event::Text(t) = event {
                texts.push(t.to_string());
                return Visit::Stop;
            }
            Visit::Continue
        });
        assert!(stopped);
        assert_eq!(texts, ["One"]);
    }

    #[test]
    fn test_push_inline_text_skips_math() {
        let mut buf = String::new();
        for (event, _) in events("# Proof of $x^2$ and `code`") {
            push_inline_text(&mut buf, &event);
        }
        assert_eq!(buf, "Proof of  and code");
    }
}
