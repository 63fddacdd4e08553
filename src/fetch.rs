//! Source collaborators: the paginated items API and the namespace context.
//!
//! Both are traits so the pipeline can run against canned pages in tests.
//! The HTTP implementations use blocking `ureq` agents with the configured
//! timeout on every request.

use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::FetchError;

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Media types accepted as Turtle pages.
const TURTLE_MEDIA_TYPES: &[&str] = &["text/turtle", "application/x-turtle", "application/turtle"];

/// A paginated source of serialized-graph text.
pub trait SourceProvider {
    /// Page `page` (1-based), or `None` once the data has run out.
    fn fetch_page(&self, page: u32) -> FetchResult<Option<String>>;

    /// Human-readable location for diagnostics.
    fn describe(&self) -> String;
}

/// Supplies prefix → namespace bindings for serialization.
pub trait ContextProvider {
    fn namespaces(&self) -> FetchResult<Vec<(String, String)>>;
}

/// Fetch pages `1..=max_pages`.
///
/// Stops early at the first page the provider reports as past the end. An
/// empty first page is an error: there is nothing to transform. Each page is
/// a complete document and is parsed on its own, so blank-node labels never
/// leak from one page into the next.
pub fn fetch_pages(source: &dyn SourceProvider, max_pages: u32) -> FetchResult<Vec<String>> {
    let mut pages = Vec::new();
    for page in 1..=max_pages {
        match source.fetch_page(page)? {
            Some(body) => {
                tracing::debug!(page, bytes = body.len(), "fetched page");
                pages.push(body);
            }
            None => {
                tracing::info!(page, "end of data");
                break;
            }
        }
    }
    if pages.is_empty() {
        return Err(FetchError::NoData {
            url: source.describe(),
        });
    }
    let bytes: usize = pages.iter().map(String::len).sum();
    tracing::info!(pages = pages.len(), bytes, "fetched source pages");
    Ok(pages)
}

/// Whether a page body carries statements rather than only directives.
pub fn looks_like_data(body: &str) -> bool {
    body.lines().map(str::trim).any(|line| {
        !line.is_empty()
            && !line.starts_with('#')
            && !line.starts_with("@prefix")
            && !line.starts_with("@base")
            && !line.to_ascii_uppercase().starts_with("PREFIX")
            && !line.to_ascii_uppercase().starts_with("BASE")
    })
}

fn agent(config: &PipelineConfig) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(config.http_timeout).build()
}

fn get(agent: &ureq::Agent, url: &str, accept: &str) -> FetchResult<ureq::Response> {
    match agent.get(url).set("Accept", accept).call() {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, _)) => Err(FetchError::Status {
            url: url.to_string(),
            status,
        }),
        Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        }),
    }
}

/// The Omeka S `api/items` endpoint.
pub struct HttpSource {
    agent: ureq::Agent,
    config: PipelineConfig,
}

impl HttpSource {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            agent: agent(config),
            config: config.clone(),
        }
    }
}

impl SourceProvider for HttpSource {
    fn fetch_page(&self, page: u32) -> FetchResult<Option<String>> {
        let url = self.config.page_url(page);
        let response = get(&self.agent, &url, "text/turtle")?;

        let content_type = response.content_type().to_ascii_lowercase();
        if !TURTLE_MEDIA_TYPES.contains(&content_type.as_str()) {
            tracing::info!(page, content_type = %content_type, "page is not turtle");
            return Ok(None);
        }
        let body = response.into_string().map_err(|e| FetchError::Body {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(looks_like_data(&body).then_some(body))
    }

    fn describe(&self) -> String {
        self.config.page_url(1)
    }
}

/// The Omeka S `api-context` JSON-LD context document.
pub struct HttpContext {
    agent: ureq::Agent,
    url: String,
}

impl HttpContext {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            agent: agent(config),
            url: config.context_url(),
        }
    }
}

impl ContextProvider for HttpContext {
    fn namespaces(&self) -> FetchResult<Vec<(String, String)>> {
        let response = get(&self.agent, &self.url, "application/ld+json, application/json")?;
        let document: Value = response.into_json().map_err(|e| FetchError::Body {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        context_bindings(&document).map_err(|message| FetchError::Context {
            url: self.url.clone(),
            message,
        })
    }
}

/// Extract prefix bindings from a JSON-LD context document.
///
/// Values are either IRI strings or objects with an `@id`; other entries are
/// ignored. Backslashes left over from escaping are stripped.
pub fn context_bindings(document: &Value) -> Result<Vec<(String, String)>, String> {
    let context = document
        .get("@context")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing \"@context\" object".to_string())?;

    Ok(context
        .iter()
        .filter_map(|(prefix, value)| {
            let iri = match value {
                Value::String(s) => s.as_str(),
                Value::Object(obj) => obj.get("@id")?.as_str()?,
                _ => return None,
            };
            Some((prefix.clone(), iri.replace('\\', "")))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Pages {
        pages: Vec<&'static str>,
        calls: Cell<u32>,
    }

    impl SourceProvider for Pages {
        fn fetch_page(&self, page: u32) -> FetchResult<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .pages
                .get(page as usize - 1)
                .map(|p| p.to_string())
                .filter(|p| looks_like_data(p)))
        }

        fn describe(&self) -> String {
            "pages".into()
        }
    }

    #[test]
    fn stops_at_first_empty_page() {
        let source = Pages {
            pages: vec!["<a> <b> <c> .", "<d> <e> <f> .", "@prefix x: <http://x/> .", "<g> <h> <i> ."],
            calls: Cell::new(0),
        };
        let pages = fetch_pages(&source, 10).unwrap();
        assert_eq!(pages, vec!["<a> <b> <c> .", "<d> <e> <f> ."]);
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn respects_page_limit() {
        let source = Pages {
            pages: vec!["<a> <b> <c> .", "<d> <e> <f> ."],
            calls: Cell::new(0),
        };
        let pages = fetch_pages(&source, 1).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn no_data_is_an_error() {
        let source = Pages {
            pages: vec![],
            calls: Cell::new(0),
        };
        assert!(matches!(
            fetch_pages(&source, 5),
            Err(FetchError::NoData { .. })
        ));
    }

    #[test]
    fn directive_only_pages_are_empty() {
        assert!(!looks_like_data("@prefix o: <http://omeka.org/s/vocabs/o#> .\n\n# done\n"));
        assert!(!looks_like_data("PREFIX o: <http://omeka.org/s/vocabs/o#>"));
        assert!(looks_like_data("@prefix o: <x#> .\n<a> o:b 1 ."));
    }

    #[test]
    fn context_bindings_strip_escapes() {
        let doc = serde_json::json!({
            "@context": {
                "dcterms": "http:\\/\\/purl.org\\/dc\\/terms\\/",
                "o": { "@id": "http://omeka.org/s/vocabs/o#" },
                "@vocab": { "@type": "@id" },
                "n": 3
            }
        });
        let bindings = context_bindings(&doc).unwrap();
        assert_eq!(
            bindings,
            vec![
                ("dcterms".to_string(), "http://purl.org/dc/terms/".to_string()),
                ("o".to_string(), "http://omeka.org/s/vocabs/o#".to_string()),
            ]
        );
        assert!(context_bindings(&serde_json::json!({})).is_err());
    }
}
