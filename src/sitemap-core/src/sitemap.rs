//! Sitemap documents: building them from link targets, rendering them as XML, and reading them back.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use url::Url;

use crate::config::{MalformedLinePolicy, SitemapOptions, base_url};
use crate::errors::{Result, SitemapError};
use crate::priority::{Priority, classify_priority};
use crate::toc::extract_links_with_policy;

/// XML namespace of the sitemaps.org 0.9 protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Every page is advertised with the same change frequency.
pub const CHANGE_FREQUENCY: &str = "weekly";

/// One page of the book, as it will appear in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Link target relative to the site root, e.g. `./design/wit.html`. Empty for the root itself.
    pub relative_path: String,
    pub priority: Priority,
    /// The target resolved against the base URL.
    pub loc: Url,
}

impl LinkEntry {
    /// Classifies the target and resolves it against the base URL.
    pub fn resolve(base_url: &Url, relative_path: String, higher_priority_section: Option<&str>) -> Result<Self> {
        let loc = base_url
            .join(&relative_path)
            .map_err(|source| SitemapError::UnresolvableLink {
                path: relative_path.clone(),
                source,
            })?;
        let priority = classify_priority(&relative_path, higher_priority_section);
        Ok(Self {
            relative_path,
            priority,
            loc,
        })
    }

    /// The synthetic entry for the site root. Its location is the base URL itself.
    pub fn root(base_url: &Url) -> Self {
        Self {
            relative_path: String::new(),
            priority: classify_priority("", None),
            loc: base_url.clone(),
        }
    }
}

/// An ordered list of pages under one base URL.
///
/// The site root is always the first entry. Entries keep their input order and are never deduplicated.
/// Every entry is resolved when the document is built, so rendering never fails on a bad link.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    base_url: Url,
    entries: Vec<LinkEntry>,
}

impl SitemapDocument {
    /// Resolves and classifies every relative path and places them after the site root.
    ///
    /// A target that does not resolve against the base URL is dropped with a warning under
    /// [`MalformedLinePolicy::Skip`], and fails the build under [`MalformedLinePolicy::Fail`].
    pub fn new<I>(
        base_url: Url,
        relative_paths: I,
        higher_priority_section: Option<&str>,
        policy: MalformedLinePolicy,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut entries = vec![LinkEntry::root(&base_url)];

        for path in relative_paths {
            match LinkEntry::resolve(&base_url, path, higher_priority_section) {
                Ok(entry) => entries.push(entry),
                Err(SitemapError::UnresolvableLink { path, source }) if policy == MalformedLinePolicy::Skip => {
                    tracing::warn!(path = %path, %source, "Skipping link that does not resolve to a URL");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self { base_url, entries })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Number of `<url>` elements the rendered document holds, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the root entry is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the whole document as sitemap XML.
    pub fn render(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Start(
                BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
            ))
            .map_err(xml_error)?;

        for entry in self.entries.iter() {
            tracing::debug!(path = %entry.relative_path, loc = %entry.loc, priority = %entry.priority, "Adding sitemap entry");

            writer
                .write_event(Event::Start(BytesStart::new("url")))
                .map_err(xml_error)?;
            write_text_element(&mut writer, "loc", entry.loc.as_str())?;
            write_text_element(&mut writer, "changefreq", CHANGE_FREQUENCY)?;
            write_text_element(&mut writer, "priority", entry.priority.as_str())?;
            writer.write_event(Event::End(BytesEnd::new("url"))).map_err(xml_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("urlset")))
            .map_err(xml_error)?;

        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)?;
    Ok(())
}

fn xml_error<E: std::fmt::Display>(err: E) -> SitemapError {
    SitemapError::XmlError(err.to_string())
}

/// Builds the sitemap for `https://{domain}/` from already-extracted relative paths.
///
/// The site root is prepended, so the document holds one more `<url>` than there are paths,
/// less any path that does not resolve to a URL (those are skipped with a warning).
/// Does no I/O.
pub fn build_sitemap<I>(domain: &str, relative_paths: I, higher_priority_section: Option<&str>) -> Result<String>
where
    I: IntoIterator<Item = String>,
{
    let section = higher_priority_section.filter(|s| !s.is_empty());
    SitemapDocument::new(base_url(domain)?, relative_paths, section, MalformedLinePolicy::Skip)?.render()
}

/// Extracts every link from the table of contents text into a sitemap document.
pub fn generate_document(toc: &str, options: &SitemapOptions) -> Result<SitemapDocument> {
    let links = extract_links_with_policy(toc, options.malformed_lines)?;
    tracing::info!(
        domain = %options.domain,
        links = links.len(),
        section = ?options.section(),
        "Generating sitemap"
    );
    SitemapDocument::new(options.base_url()?, links, options.section(), options.malformed_lines)
}

/// Extracts every link from the table of contents text and renders the sitemap for them.
pub fn generate(toc: &str, options: &SitemapOptions) -> Result<String> {
    generate_document(toc, options)?.render()
}

/// A parsed sitemap.
#[derive(Debug, Clone)]
pub struct Sitemap {
    /// List of URLs from the sitemap
    pub urls: Vec<SitemapUrl>,
}

/// A single `<url>` entry of a parsed sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapUrl {
    pub loc: String,
    pub changefreq: Option<String>,
    pub priority: Option<String>,
}

impl Sitemap {
    /// Returns the `<loc>` of every entry, in document order.
    pub fn sites(&self) -> Vec<String> {
        self.urls.iter().map(|u| u.loc.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Loc,
    ChangeFreq,
    Priority,
}

/// The root must be `<urlset>` in the sitemaps.org 0.9 namespace.
fn check_root(root: &BytesStart) -> Result<()> {
    if root.name().as_ref() != b"urlset" {
        return Err(SitemapError::XmlError(format!(
            "Expected <urlset> root element, found <{}>",
            String::from_utf8_lossy(root.name().as_ref())
        )));
    }

    let xmlns = root.try_get_attribute("xmlns").map_err(xml_error)?;
    match xmlns {
        Some(attr) if attr.value.as_ref() == SITEMAP_NAMESPACE.as_bytes() => Ok(()),
        Some(attr) => Err(SitemapError::XmlError(format!(
            "Expected <urlset> in namespace {SITEMAP_NAMESPACE}, found {}",
            String::from_utf8_lossy(attr.value.as_ref())
        ))),
        None => Err(SitemapError::XmlError(format!(
            "Expected <urlset> in namespace {SITEMAP_NAMESPACE}, found no xmlns"
        ))),
    }
}

fn content_after_root() -> SitemapError {
    SitemapError::XmlError("Content found after the closing </urlset>".to_string())
}

/// Parses sitemap XML, checking that it is well-formed and rooted at `<urlset>`.
///
/// # Errors
///
/// Returns an error if:
/// - The XML is malformed: mismatched or unclosed elements, text outside the root, or a second root
/// - The root element is not `urlset` in the sitemaps.org 0.9 namespace
/// - No URLs are found
pub fn parse_sitemap(xml: &str) -> Result<Sitemap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut depth: usize = 0;
    let mut root_closed = false;
    let mut current: Option<SitemapUrl> = None;
    let mut field: Option<Field> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if root_closed {
                    return Err(content_after_root());
                }
                if depth == 0 {
                    check_root(&e)?;
                } else {
                    field = None;
                    match e.name().as_ref() {
                        b"url" => current = Some(SitemapUrl::default()),
                        b"loc" => field = Some(Field::Loc),
                        b"changefreq" => field = Some(Field::ChangeFreq),
                        b"priority" => field = Some(Field::Priority),
                        _ => {}
                    }
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if root_closed {
                    return Err(content_after_root());
                }
                if depth == 0 {
                    check_root(&e)?;
                    root_closed = true;
                }
            }
            Ok(Event::Text(text)) => {
                if text.iter().all(|b| b.is_ascii_whitespace()) {
                    // whitespace between elements
                } else if root_closed {
                    return Err(content_after_root());
                } else if depth == 0 {
                    return Err(SitemapError::XmlError(
                        "Text found before the <urlset> root element".to_string(),
                    ));
                } else if let (Some(field), Some(url)) = (field, current.as_mut()) {
                    let value = text
                        .unescape()
                        .map_err(|e| SitemapError::XmlError(format!("Invalid XML: {}", e)))?
                        .into_owned();
                    match field {
                        Field::Loc => url.loc = value,
                        Field::ChangeFreq => url.changefreq = Some(value),
                        Field::Priority => url.priority = Some(value),
                    }
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
                if e.name().as_ref() == b"url"
                    && let Some(url) = current.take()
                    && !url.loc.is_empty()
                {
                    urls.push(url);
                }
            }
            Ok(Event::Eof) => {
                if depth > 0 {
                    return Err(SitemapError::XmlError(format!(
                        "Unexpected end of document: {} element(s) left unclosed",
                        depth
                    )));
                }
                break;
            }
            Err(e) => return Err(SitemapError::XmlError(format!("XML parsing error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if urls.is_empty() {
        return Err(SitemapError::XmlError("No URLs found in sitemap".to_string()));
    }

    Ok(Sitemap { urls })
}
