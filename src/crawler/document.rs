//! Lazily parsed document wrapper
//!
//! A [`Document`] owns the raw text of exactly one fetched response plus a
//! declared format (HTML or XML). Parsing happens at most once, on the first
//! query, and the parsed tree is cached for the lifetime of the instance.
//! Instances are never reused across documents.
//!
//! HTML documents are parsed with `scraper`; XML documents are parsed with
//! `quick-xml` into a small owned element tree. Malformed XML yields whatever
//! elements were read before the error (possibly none) rather than failing:
//! for sitemap resolution, unparseable content means "zero URLs found".

use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::{Html, Selector};

/// Declared format of a fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Xml,
}

/// One element of a parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name, without namespace prefix
    pub name: String,

    /// Concatenated direct text content
    pub text: String,

    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Returns the text of the first direct child with the given tag name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .map(|child| child.text.as_str())
    }
}

/// Cached parse result for a document
#[derive(Debug)]
enum ParsedTree {
    Html(Html),
    Xml(Vec<XmlElement>),
}

/// A fetched document with on-demand cached parsing
#[derive(Debug)]
pub struct Document {
    raw: String,
    format: DocumentFormat,
    parsed: Option<ParsedTree>,
}

impl Document {
    /// Wraps raw fetched text with its declared format
    ///
    /// No parsing happens here; the first query triggers it.
    pub fn new(raw: String, format: DocumentFormat) -> Self {
        Self {
            raw,
            format,
            parsed: None,
        }
    }

    /// Parses on first access and returns the cached tree afterwards
    fn parsed(&mut self) -> &ParsedTree {
        if self.parsed.is_none() {
            let tree = match self.format {
                DocumentFormat::Html => ParsedTree::Html(Html::parse_document(&self.raw)),
                DocumentFormat::Xml => ParsedTree::Xml(parse_xml_tree(&self.raw)),
            };
            self.parsed = Some(tree);
        }

        // Populated just above
        self.parsed.as_ref().unwrap()
    }

    /// Returns true iff at least one `<meta name="...">` tag with the given
    /// name exists in an HTML document
    ///
    /// Always false for XML documents.
    pub fn has_meta_tag(&mut self, name: &str) -> bool {
        self.find_meta(name).is_some()
    }

    /// Returns the `content` attribute of the first `<meta name="...">` tag
    /// with the given name
    ///
    /// `None` when no matching tag exists or the matching tag has no
    /// `content` attribute.
    pub fn meta_content(&mut self, name: &str) -> Option<String> {
        self.find_meta(name).flatten()
    }

    /// Finds the first matching meta tag
    ///
    /// Outer `Option` is whether the tag exists, inner is its `content`
    /// attribute.
    fn find_meta(&mut self, name: &str) -> Option<Option<String>> {
        let ParsedTree::Html(document) = self.parsed() else {
            return None;
        };

        let selector = Selector::parse("meta").ok()?;

        document
            .select(&selector)
            .find(|element| element.value().attr("name") == Some(name))
            .map(|element| element.value().attr("content").map(str::to_string))
    }

    /// Collects all XML elements with the given tag name, depth-first
    ///
    /// Always empty for HTML documents.
    pub fn xml_elements(&mut self, tag: &str) -> Vec<&XmlElement> {
        let ParsedTree::Xml(roots) = self.parsed() else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = roots.iter().rev().collect();

        while let Some(element) = stack.pop() {
            if element.name == tag {
                found.push(element);
            }
            for child in element.children.iter().rev() {
                stack.push(child);
            }
        }

        found
    }
}

/// Parses XML text into a forest of owned elements
///
/// Namespace prefixes are stripped so `<sm:loc>` matches lookups for `loc`.
/// On a parse error the elements read so far are returned as-is.
fn parse_xml_tree(raw: &str) -> Vec<XmlElement> {
    let mut reader = Reader::from_str(raw);
    let mut roots: Vec<XmlElement> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = local_name(start.name().as_ref());
                stack.push(XmlElement::new(name));
            }
            Ok(Event::Empty(start)) => {
                let name = local_name(start.name().as_ref());
                attach(XmlElement::new(name), &mut stack, &mut roots);
            }
            Ok(Event::Text(text)) => {
                if let (Some(current), Ok(unescaped)) = (stack.last_mut(), text.unescape()) {
                    current.text.push_str(unescaped.trim());
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data);
                    current.text.push_str(text.trim());
                }
            }
            Ok(Event::End(_)) => {
                if let Some(finished) = stack.pop() {
                    attach(finished, &mut stack, &mut roots);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!("XML parse error at byte {}: {}", reader.buffer_position(), e);
                break;
            }
            Ok(_) => {}
        }
    }

    // Unclosed elements at EOF still count
    while let Some(dangling) = stack.pop() {
        attach(dangling, &mut stack, &mut roots);
    }

    roots
}

fn attach(element: XmlElement, stack: &mut Vec<XmlElement>, roots: &mut Vec<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}

fn local_name(qualified: &[u8]) -> String {
    let name = String::from_utf8_lossy(qualified);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_meta_tag_present() {
        let html = r#"<html><head><meta name="robots" content="index, follow"></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert!(doc.has_meta_tag("robots"));
    }

    #[test]
    fn test_has_meta_tag_absent() {
        let html = r#"<html><head><meta name="title" content="x"></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert!(!doc.has_meta_tag("robots"));
    }

    #[test]
    fn test_meta_content_present() {
        let html = r#"<html><head><meta name="description" content="A page"></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert_eq!(doc.meta_content("description"), Some("A page".to_string()));
    }

    #[test]
    fn test_meta_content_missing_tag() {
        let html = r#"<html><head></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert_eq!(doc.meta_content("description"), None);
    }

    #[test]
    fn test_meta_content_without_content_attr() {
        let html = r#"<html><head><meta name="description"></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert!(doc.has_meta_tag("description"));
        assert_eq!(doc.meta_content("description"), None);
    }

    #[test]
    fn test_repeated_queries_reuse_parse() {
        let html = r#"<html><head><meta name="robots" content="noindex"></head></html>"#;
        let mut doc = Document::new(html.to_string(), DocumentFormat::Html);
        assert!(doc.has_meta_tag("robots"));
        assert!(doc.parsed.is_some());
        assert_eq!(doc.meta_content("robots"), Some("noindex".to_string()));
    }

    #[test]
    fn test_xml_elements_leaf_sitemap() {
        let xml = r#"<?xml version="1.0"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>https://example.com/page1</loc></url>
                <url><loc> https://example.com/page2 </loc></url>
            </urlset>"#;
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);

        let urls = doc.xml_elements("url");
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].child_text("loc"), Some("https://example.com/page1"));
        assert_eq!(urls[1].child_text("loc"), Some("https://example.com/page2"));
    }

    #[test]
    fn test_xml_elements_sitemap_index() {
        let xml = r#"<sitemapindex>
                <sitemap><loc>https://example.com/a.xml</loc></sitemap>
                <sitemap><loc>https://example.com/b.xml</loc></sitemap>
            </sitemapindex>"#;
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);

        let sitemaps = doc.xml_elements("sitemap");
        assert_eq!(sitemaps.len(), 2);
        assert_eq!(sitemaps[0].child_text("loc"), Some("https://example.com/a.xml"));
    }

    #[test]
    fn test_xml_namespace_prefix_stripped() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sm:url><sm:loc>https://example.com/ns</sm:loc></sm:url>
            </sm:urlset>"#;
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);

        let urls = doc.xml_elements("url");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].child_text("loc"), Some("https://example.com/ns"));
    }

    #[test]
    fn test_malformed_xml_yields_no_elements() {
        let xml = "this is not xml at all <<<>>>";
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);
        assert!(doc.xml_elements("url").is_empty());
    }

    #[test]
    fn test_unrelated_xml_has_no_sitemap_elements() {
        let xml = r#"<catalog><book><title>Neither index nor leaf</title></book></catalog>"#;
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);
        assert!(doc.xml_elements("url").is_empty());
        assert!(doc.xml_elements("sitemap").is_empty());
        assert_eq!(doc.xml_elements("book").len(), 1);
    }

    #[test]
    fn test_meta_queries_on_xml_document() {
        let xml = r#"<urlset><url><loc>https://example.com/</loc></url></urlset>"#;
        let mut doc = Document::new(xml.to_string(), DocumentFormat::Xml);
        assert!(!doc.has_meta_tag("robots"));
        assert_eq!(doc.meta_content("robots"), None);
    }
}
