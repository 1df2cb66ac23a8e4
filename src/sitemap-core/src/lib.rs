//! # book-sitemap
//!
//! Turns an mdBook table of contents (`SUMMARY.md`) into a sitemaps.org 0.9 `sitemap.xml`.
//!
//! Every `[label](target)` link in the table of contents becomes one `<url>` entry, after the
//! site root. Targets ending in `.md` are rewritten to `.html`, resolved against
//! `https://{domain}/`, and given a priority:
//!
//! - `1.0` for top-level pages (at most one `/` in the target),
//! - `0.8` for pages under the optional higher-priority section (`./{section}...`),
//! - `0.5` for everything else.
//!
//! ## Example
//!
//! ```
//! use sitemap_core::{SitemapOptions, generate, parse_sitemap};
//!
//! let toc = "- [Intro](./intro.md)\n- [WIT](./design/wit.md)\n";
//! let options = SitemapOptions::builder()
//!     .domain("example.org".to_string())
//!     .higher_priority_section("design".to_string())
//!     .build()?;
//!
//! let xml = generate(toc, &options)?;
//! let sitemap = parse_sitemap(&xml)?;
//! assert_eq!(
//!     sitemap.sites(),
//!     vec![
//!         "https://example.org/",
//!         "https://example.org/intro.html",
//!         "https://example.org/design/wit.html",
//!     ]
//! );
//! # Ok::<(), sitemap_core::SitemapError>(())
//! ```

pub mod common;
pub mod config;
mod errors;
pub mod priority;
pub mod sitemap;
pub mod toc;

pub use config::{MalformedLinePolicy, SitemapOptions, SitemapOptionsBuilder, SitemapPaths};
pub use errors::{Result, SitemapError};
pub use priority::{Priority, classify_priority};
pub use sitemap::{
    LinkEntry, Sitemap, SitemapDocument, SitemapUrl, build_sitemap, generate, generate_document, parse_sitemap,
};
pub use toc::{
    LinkLine, TocLinks, extract_links, extract_links_with_policy, html_target, parse_link_line, try_extract_links,
};
