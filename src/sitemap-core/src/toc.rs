//! Link extraction from a markdown table of contents (e.g. mdBook's `SUMMARY.md`).

use crate::config::MalformedLinePolicy;
use crate::errors::{Result, SitemapError};

/// Two-character marker separating a link label from its target: `[label](target)`.
pub const LINK_MARKER: &str = "](";

/// What a single line of the table of contents holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLine<'a> {
    /// The line has no `](` marker.
    NoLink,
    /// The raw link target, i.e. everything after the first `](` up to the next `)`.
    Target(&'a str),
    /// The line has a `](` marker but no `)` after it.
    Unterminated,
}

/// Splits the line on the first link marker, then takes everything up to the next closing parenthesis.
///
/// ```
/// # use sitemap_core::toc::{parse_link_line, LinkLine};
/// assert_eq!(parse_link_line("- [Intro](./intro.md)"), LinkLine::Target("./intro.md"));
/// assert_eq!(parse_link_line("# Summary"), LinkLine::NoLink);
/// assert_eq!(parse_link_line("- [Oops](./oops.md"), LinkLine::Unterminated);
/// ```
pub fn parse_link_line(line: &str) -> LinkLine<'_> {
    match line.split_once(LINK_MARKER) {
        None => LinkLine::NoLink,
        Some((_label, rest)) => match rest.split_once(')') {
            Some((target, _)) => LinkLine::Target(target),
            None => LinkLine::Unterminated,
        },
    }
}

/// Rewrites a trailing `.md` into `.html`, which is where mdBook renders each chapter.
///
/// ```
/// # use sitemap_core::toc::html_target;
/// assert_eq!(html_target("./intro.md"), "./intro.html");
/// assert_eq!(html_target("./intro.html"), "./intro.html");
/// assert_eq!(html_target(""), "");
/// ```
pub fn html_target(target: &str) -> String {
    match target.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html"),
        None => target.to_string(),
    }
}

/// Lazy iterator over the (rewritten) link targets of a table of contents, in line order.
///
/// Unterminated links are skipped with a warning. A clone iterates independently from the
/// same position; call [`extract_links`] again to start over from the first line.
#[derive(Debug, Clone)]
pub struct TocLinks<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl Iterator for TocLinks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.lines.by_ref() {
            match parse_link_line(line) {
                LinkLine::NoLink => {}
                LinkLine::Target(target) => return Some(html_target(target)),
                LinkLine::Unterminated => {
                    tracing::warn!(line_number = index + 1, line, "Skipping link with no closing ')'");
                }
            }
        }
        None
    }
}

/// Extracts every link target from the table of contents text.
pub fn extract_links(toc: &str) -> TocLinks<'_> {
    TocLinks {
        lines: toc.lines().enumerate(),
    }
}

/// Same as `extract_links`, but an unterminated link fails the whole extraction.
pub fn try_extract_links(toc: &str) -> Result<Vec<String>> {
    let mut links = Vec::new();
    for (index, line) in toc.lines().enumerate() {
        match parse_link_line(line) {
            LinkLine::NoLink => {}
            LinkLine::Target(target) => links.push(html_target(target)),
            LinkLine::Unterminated => {
                return Err(SitemapError::MalformedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                });
            }
        }
    }
    Ok(links)
}

/// Extracts link targets, treating unterminated links according to the policy.
pub fn extract_links_with_policy(toc: &str, policy: MalformedLinePolicy) -> Result<Vec<String>> {
    match policy {
        MalformedLinePolicy::Skip => Ok(extract_links(toc).collect()),
        MalformedLinePolicy::Fail => try_extract_links(toc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SUMMARY: &str = indoc! { "
        # Summary

        [Introduction](./introduction.md)

        # Design

        - [Why the Component Model?](./design/why-component-model.md)
        - [Packages](./design/packages.md)
            - [WIT](./design/wit.md)

        ---

        [Reference](https://example.com/reference)
    " };

    #[test]
    fn test_parse_link_line() {
        assert_eq!(parse_link_line("- [A](./a.md)"), LinkLine::Target("./a.md"));
        assert_eq!(parse_link_line("[A]()"), LinkLine::Target(""));
        assert_eq!(parse_link_line("plain text"), LinkLine::NoLink);
        assert_eq!(parse_link_line(""), LinkLine::NoLink);
        assert_eq!(parse_link_line("- [A](./a.md"), LinkLine::Unterminated);
    }

    #[test]
    fn test_parse_link_line_uses_first_marker_and_next_paren() {
        assert_eq!(parse_link_line("[A](./a.md) and [B](./b.md)"), LinkLine::Target("./a.md"));
        assert_eq!(parse_link_line("[A](./a](b).md)"), LinkLine::Target("./a](b"));
    }

    #[test]
    fn test_html_target() {
        assert_eq!(html_target("./design/wit.md"), "./design/wit.html");
        assert_eq!(html_target("./readme.markdown"), "./readme.markdown");
        assert_eq!(html_target("https://example.com/reference"), "https://example.com/reference");
        assert_eq!(html_target(".md"), ".html");
    }

    #[test]
    fn test_extract_links() {
        let links: Vec<String> = extract_links(SUMMARY).collect();
        assert_eq!(
            links,
            vec![
                "./introduction.html",
                "./design/why-component-model.html",
                "./design/packages.html",
                "./design/wit.html",
                "https://example.com/reference",
            ]
        );
    }

    #[test]
    fn test_extract_links_restarts() {
        let first: Vec<String> = extract_links(SUMMARY).collect();
        let second: Vec<String> = extract_links(SUMMARY).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_links_skips_unterminated() {
        let toc = "- [A](./a.md)\n- [Broken](./broken.md\n- [B](./b.md)\n";
        let links: Vec<String> = extract_links(toc).collect();
        assert_eq!(links, vec!["./a.html", "./b.html"]);
    }

    #[test]
    fn test_extract_links_handles_crlf() {
        let toc = "- [A](./a.md)\r\n- [B](./b/c.md)\r\n";
        let links: Vec<String> = extract_links(toc).collect();
        assert_eq!(links, vec!["./a.html", "./b/c.html"]);
    }

    #[test]
    fn test_try_extract_links_fails_on_unterminated() {
        let toc = "- [A](./a.md)\n- [Broken](./broken.md\n";
        match try_extract_links(toc) {
            Err(SitemapError::MalformedLine { line_number, line }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "- [Broken](./broken.md");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_links_with_policy() {
        let toc = "- [Broken](./broken.md\n- [A](./a.md)\n";
        assert_eq!(
            extract_links_with_policy(toc, MalformedLinePolicy::Skip).unwrap(),
            vec!["./a.html"]
        );
        assert!(extract_links_with_policy(toc, MalformedLinePolicy::Fail).is_err());
        assert_eq!(
            extract_links_with_policy(SUMMARY, MalformedLinePolicy::Fail).unwrap().len(),
            5
        );
    }

    #[test]
    fn test_extract_links_empty() {
        assert_eq!(extract_links("").count(), 0);
        assert!(try_extract_links("# Only a heading\n").unwrap().is_empty());
    }
}
