//! Rendering boundary
//!
//! `PresentationContext` is the only thing the template ever sees. It carries
//! the query plus either a result set or an error, never both.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError, TemplateError,
};
use serde::Serialize;
use url::form_urlencoded;

use crate::data::{LookupError, WordEntry};

const MAIN_TEMPLATE_NAME: &str = "main";
const MAIN_TEMPLATE: &str = include_str!("../templates/main.hbs");

/// Render-ready data for one page
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PresentationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    words: Vec<WordEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<LookupError>,
}

impl PresentationContext {
    /// The landing page: no query, no results
    pub fn initial() -> Self {
        Self::default()
    }

    /// A lookup that produced nothing to show and nothing to report
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// A lookup that produced dictionary entries
    pub fn words(query: impl Into<String>, words: Vec<WordEntry>) -> Self {
        Self {
            query: Some(query.into()),
            words,
            error: None,
        }
    }

    /// A lookup the API answered with an error
    pub fn error(query: impl Into<String>, error: LookupError) -> Self {
        Self {
            query: Some(query.into()),
            words: Vec::new(),
            error: Some(error),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.words
    }

    pub fn lookup_error(&self) -> Option<&LookupError> {
        self.error.as_ref()
    }
}

/// Turns presentation contexts into HTML pages
#[derive(Debug)]
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Creates a renderer with the built-in page template
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_template(MAIN_TEMPLATE)
    }

    /// Creates a renderer from custom template source
    pub fn with_template(source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_helper("urlencode", Box::new(urlencode_helper));
        registry.register_template_string(MAIN_TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Renders the page for a context
    pub fn render(&self, context: &PresentationContext) -> Result<String, RenderError> {
        self.registry.render(MAIN_TEMPLATE_NAME, context)
    }
}

/// Percent-encodes a value for use inside a query string
fn urlencode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    let encoded: String = form_urlencoded::byte_serialize(param.as_bytes()).collect();
    out.write(&encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Definition, Meaning, Phonetic};

    fn hello_entry() -> WordEntry {
        WordEntry {
            word: "hello".to_string(),
            phonetics: vec![Phonetic {
                text: Some("həˈləʊ".to_string()),
                audio: Some("https://example.com/hello.mp3".to_string()),
                source_url: None,
            }],
            meanings: vec![Meaning {
                part_of_speech: "exclamation".to_string(),
                definitions: vec![Definition {
                    definition: "used as a greeting".to_string(),
                    example: Some("hello there, Katie!".to_string()),
                    synonyms: vec!["hi".to_string()],
                    antonyms: vec![],
                }],
                synonyms: vec![],
                antonyms: vec!["goodbye".to_string()],
            }],
            ..WordEntry::default()
        }
    }

    fn not_found() -> LookupError {
        LookupError {
            title: "No Definitions Found — zzxq".to_string(),
            message: "Sorry pal, we couldn't find definitions.".to_string(),
            resolution: None,
        }
    }

    #[test]
    fn test_constructors_keep_words_and_error_exclusive() {
        let words = PresentationContext::words("hello", vec![hello_entry()]);
        assert_eq!(words.entries().len(), 1);
        assert!(words.lookup_error().is_none());

        let error = PresentationContext::error("zzxq", not_found());
        assert!(error.entries().is_empty());
        assert!(error.lookup_error().is_some());

        let empty = PresentationContext::empty("hello");
        assert!(empty.entries().is_empty());
        assert!(empty.lookup_error().is_none());
        assert_eq!(empty.query(), Some("hello"));

        assert!(PresentationContext::initial().query().is_none());
    }

    #[test]
    fn test_render_initial_page() {
        let renderer = PageRenderer::new().expect("Template should compile");

        let html = renderer.render(&PresentationContext::initial()).unwrap();

        assert!(html.contains("<form action=\"/search\""));
        assert!(html.contains("/static/dict.css"));
        assert!(!html.contains("class=\"entry\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_render_words() {
        let renderer = PageRenderer::new().unwrap();

        let html = renderer
            .render(&PresentationContext::words("hello", vec![hello_entry()]))
            .unwrap();

        assert!(html.contains("<h1 class=\"word\">hello</h1>"));
        assert!(html.contains("used as a greeting"));
        assert!(html.contains("hello there, Katie!"));
        assert!(html.contains("exclamation"));
        assert!(html.contains("https://example.com/hello.mp3"));
        assert!(html.contains(">hi</a>"));
        assert!(html.contains(">goodbye</a>"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_render_error_without_words() {
        let renderer = PageRenderer::new().unwrap();

        let html = renderer
            .render(&PresentationContext::error("zzxq", not_found()))
            .unwrap();

        assert!(html.contains("No Definitions Found — zzxq"));
        assert!(html.contains("Sorry pal"));
        assert!(!html.contains("class=\"entry\""));
    }

    #[test]
    fn test_render_escapes_html() {
        let renderer = PageRenderer::new().unwrap();
        let mut entry = hello_entry();
        entry.word = "<script>alert(1)</script>".to_string();

        let html = renderer
            .render(&PresentationContext::words("<script>", vec![entry]))
            .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_synonym_links_are_query_encoded() {
        let renderer = PageRenderer::new().unwrap();
        let mut entry = hello_entry();
        entry.meanings[0].definitions[0].synonyms = vec!["rock & roll".to_string()];
        entry.meanings[0].antonyms = vec!["50%+#1".to_string()];

        let html = renderer
            .render(&PresentationContext::words("hello", vec![entry]))
            .unwrap();

        assert!(html.contains(r#"<a href="/search?word=rock+%26+roll">rock &amp; roll</a>"#));
        assert!(html.contains(r#"<a href="/search?word=50%25%2B%231">"#));
        assert!(!html.contains("word=rock &amp;"));
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(PageRenderer::with_template("{{#each words}}<p>").is_err());
    }
}
