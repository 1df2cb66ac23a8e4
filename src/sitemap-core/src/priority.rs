//! Sitemap priority classes for book pages.

/// How important a page is relative to the rest of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Everything not covered by the other classes: `0.5`.
    Default,
    /// Pages inside the higher-priority section: `0.8`.
    Section,
    /// Top-level pages, including the site root: `1.0`.
    Top,
}

impl Priority {
    /// The decimal value written into `<priority>`, always with one fractional digit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Top => "1.0",
            Priority::Section => "0.8",
            Priority::Default => "0.5",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Assigns a priority to a relative link target. First matching rule wins:
///
/// 1. At most one `/` in the path: [`Priority::Top`]. This includes the empty root path.
/// 2. The path starts with `./{higher_priority_section}`: [`Priority::Section`].
/// 3. Anything else: [`Priority::Default`].
///
/// Rule 2 matches the literal `./` prefix, as mdBook writes it in `SUMMARY.md`.
/// A target such as `design/wit.html` (no leading `./`) never lands in the section class.
///
/// ```
/// # use sitemap_core::priority::{classify_priority, Priority};
/// assert_eq!(classify_priority("./intro.html", None), Priority::Top);
/// assert_eq!(classify_priority("./design/doc.html", Some("design")), Priority::Section);
/// assert_eq!(classify_priority("./misc/page.html", Some("design")), Priority::Default);
/// ```
pub fn classify_priority(relative_path: &str, higher_priority_section: Option<&str>) -> Priority {
    if relative_path.matches('/').count() <= 1 {
        return Priority::Top;
    }

    match higher_priority_section {
        Some(section) if !section.is_empty() && relative_path.starts_with(&format!("./{section}")) => {
            Priority::Section
        }
        _ => Priority::Default,
    }
}
