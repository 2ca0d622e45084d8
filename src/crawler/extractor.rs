//! Selector-driven content extraction
//!
//! A page is reduced to a title, a body and an optional publication date.
//! Each of the three is produced by an ordered chain of strategies: the
//! first strategy that yields a value wins, and the chain ends in a
//! document-level fallback so extraction never fails outright.
//!
//! Boilerplate matched by the strip selectors is removed from the document
//! before any text is read.

use scraper::{ElementRef, Html, Selector};

/// Title used when neither a selector nor the `<title>` element yields text
pub const UNTITLED: &str = "Untitled";

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Text extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub body: String,
    pub published: Option<String>,
}

impl ExtractedContent {
    /// Number of whitespace-separated words in the body
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// A CSS selector that failed to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSelector {
    pub selector: String,
    pub reason: String,
}

/// One way of pulling a value out of a document
pub trait Strategy {
    fn apply(&self, root: ElementRef<'_>) -> Option<String>;
}

/// Ordered strategies evaluated until one yields a value
#[derive(Debug, Clone)]
pub struct StrategyChain<S> {
    strategies: Vec<S>,
}

impl<S: Strategy> StrategyChain<S> {
    pub fn new(strategies: Vec<S>) -> Self {
        Self { strategies }
    }

    /// Value of the first strategy that yields one
    pub fn first_match(&self, root: ElementRef<'_>) -> Option<String> {
        self.strategies.iter().find_map(|s| s.apply(root))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl<S> Default for StrategyChain<S> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

/// Title strategies
#[derive(Debug, Clone)]
pub enum TitleStrategy {
    /// Visible text of the first element matching the selector
    Selector(Selector),
    /// The document's `<title>` element
    TitleElement,
}

impl Strategy for TitleStrategy {
    fn apply(&self, root: ElementRef<'_>) -> Option<String> {
        let element = match self {
            Self::Selector(selector) => root.select(selector).next()?,
            Self::TitleElement => {
                let selector = Selector::parse("title").ok()?;
                let found = root.select(&selector).next();
                found?
            }
        };
        non_empty(visible_text(element))
    }
}

/// Body strategies
#[derive(Debug, Clone)]
pub enum BodyStrategy {
    /// Text of every element matching the selector, separated by blank lines
    Selector(Selector),
    /// All visible text of the document
    WholeDocument,
}

impl Strategy for BodyStrategy {
    fn apply(&self, root: ElementRef<'_>) -> Option<String> {
        match self {
            Self::Selector(selector) => {
                let chunks: Vec<String> = root
                    .select(selector)
                    .map(visible_text)
                    .filter(|text| !text.is_empty())
                    .collect();
                non_empty(chunks.join("\n\n"))
            }
            Self::WholeDocument => non_empty(visible_text(root)),
        }
    }
}

/// Publication date strategy: the first element matching the selector
///
/// A non-empty `datetime` attribute wins over the element's text; `<meta>`
/// elements contribute their `content` attribute instead.
#[derive(Debug, Clone)]
pub struct DateStrategy(pub Selector);

impl Strategy for DateStrategy {
    fn apply(&self, root: ElementRef<'_>) -> Option<String> {
        let element = root.select(&self.0).next()?;
        let value = element.value();

        if let Some(datetime) = value
            .attr("datetime")
            .and_then(|v| non_empty(v.trim().to_string()))
        {
            return Some(datetime);
        }

        if value.name() == "meta" {
            return value
                .attr("content")
                .and_then(|v| non_empty(v.trim().to_string()));
        }

        non_empty(visible_text(element))
    }
}

/// Compiled extraction configuration for one target
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    title: StrategyChain<TitleStrategy>,
    body: StrategyChain<BodyStrategy>,
    date: StrategyChain<DateStrategy>,
    strip: Vec<Selector>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::compile::<&str>(&[], &[], &[], &[])
    }
}

impl ExtractionRules {
    /// Compiles selector lists into extraction chains, logging rejected selectors
    pub fn compile<S: AsRef<str>>(
        content_selectors: &[S],
        title_selectors: &[S],
        strip_selectors: &[S],
        date_selectors: &[S],
    ) -> Self {
        let (rules, rejected) = Self::compile_reporting(
            content_selectors,
            title_selectors,
            strip_selectors,
            date_selectors,
        );
        for rejection in &rejected {
            tracing::warn!(
                "Dropping invalid selector '{}': {}",
                rejection.selector,
                rejection.reason
            );
        }
        rules
    }

    /// Compiles selector lists and returns the rejected selectors
    ///
    /// The title chain always ends with the `<title>` element and the body
    /// chain with the whole document.
    pub fn compile_reporting<S: AsRef<str>>(
        content_selectors: &[S],
        title_selectors: &[S],
        strip_selectors: &[S],
        date_selectors: &[S],
    ) -> (Self, Vec<RejectedSelector>) {
        let mut rejected = Vec::new();

        let mut body: Vec<BodyStrategy> = compile_selectors(content_selectors, &mut rejected)
            .into_iter()
            .map(BodyStrategy::Selector)
            .collect();
        body.push(BodyStrategy::WholeDocument);

        let mut title: Vec<TitleStrategy> = compile_selectors(title_selectors, &mut rejected)
            .into_iter()
            .map(TitleStrategy::Selector)
            .collect();
        title.push(TitleStrategy::TitleElement);

        let strip = compile_selectors(strip_selectors, &mut rejected);

        let date = compile_selectors(date_selectors, &mut rejected)
            .into_iter()
            .map(DateStrategy)
            .collect();

        let rules = Self {
            title: StrategyChain::new(title),
            body: StrategyChain::new(body),
            date: StrategyChain::new(date),
            strip,
        };
        (rules, rejected)
    }

    /// Parses `html` and extracts its title, body and publication date
    pub fn extract(&self, html: &str) -> ExtractedContent {
        let mut document = Html::parse_document(html);
        self.extract_document(&mut document)
    }

    /// Extracts from an already parsed document
    ///
    /// Strip selectors detach their matches from `document`, so read
    /// anything that needs the full page (such as links) beforehand.
    pub fn extract_document(&self, document: &mut Html) -> ExtractedContent {
        strip_elements(document, &self.strip);

        let root = document.root_element();
        let title = self
            .title
            .first_match(root)
            .unwrap_or_else(|| UNTITLED.to_string());
        let body = self.body.first_match(root).unwrap_or_default();
        let published = self.date.first_match(root);

        ExtractedContent {
            title,
            body: body.trim().to_string(),
            published,
        }
    }
}

/// Extracts title, body and publication date from raw selector lists
///
/// Convenience wrapper that compiles the selectors for a single page.
///
/// # Example
///
/// ```
/// use seed_harvest::crawler::extract_text;
///
/// let html = r#"<html><head><title>Base Camp</title></head>
///     <body><nav>Menu</nav><main><p>Welcome  to
///     the post.</p></main></body></html>"#;
/// let content = extract_text(html, &["main"], &["h1"], &["nav"], &["time"]);
/// assert_eq!(content.title, "Base Camp");
/// assert_eq!(content.body, "Welcome to the post.");
/// assert_eq!(content.published, None);
/// ```
pub fn extract_text<S: AsRef<str>>(
    html: &str,
    content_selectors: &[S],
    title_selectors: &[S],
    strip_selectors: &[S],
    date_selectors: &[S],
) -> ExtractedContent {
    ExtractionRules::compile(
        content_selectors,
        title_selectors,
        strip_selectors,
        date_selectors,
    )
    .extract(html)
}

fn compile_selectors<S: AsRef<str>>(
    selectors: &[S],
    rejected: &mut Vec<RejectedSelector>,
) -> Vec<Selector> {
    let mut compiled = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let source = selector.as_ref();
        match Selector::parse(source) {
            Ok(s) => compiled.push(s),
            Err(e) => rejected.push(RejectedSelector {
                selector: source.to_string(),
                reason: format!("{:?}", e),
            }),
        }
    }
    compiled
}

/// Detaches every element matched by any strip selector
///
/// The root `<html>` element itself is never removed.
fn strip_elements(document: &mut Html, selectors: &[Selector]) {
    let root_id = document.root_element().id();

    for selector in selectors {
        let ids: Vec<_> = document
            .root_element()
            .select(selector)
            .map(|element| element.id())
            .filter(|id| *id != root_id)
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

/// Visible text of an element with whitespace collapsed
///
/// Text fragments are joined with single spaces and runs of whitespace
/// become one space. Script, style and template contents are skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut fragments = Vec::new();
    collect_fragments(element, &mut fragments);
    collapse_whitespace(&fragments.join(" "))
}

fn collect_fragments<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let fragment: &'a str = text;
            out.push(fragment);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_element.value().name()) {
                collect_fragments(child_element, out);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
