//! HTTP client for PharoSmalltalkInteropServer
//!
//! One request per call, no retries. Every failure is folded into an
//! `Envelope` so callers only ever branch on `success`.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::endpoint::Endpoint;
use super::envelope::Envelope;

/// Bounded wait applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default directory for package export/import
pub const DEFAULT_PACKAGE_PATH: &str = "/tmp";

/// Parameter mapping for one request
pub type Params = Map<String, Value>;

/// Read-style requests go out as GET with query parameters, write-style as
/// POST with a JSON body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

enum HttpState {
    /// No request issued yet
    Idle,
    Open(Client),
    Closed,
}

/// Client for the remote interop server
pub struct PharoClient {
    endpoint: Endpoint,
    timeout: Duration,
    http: Mutex<HttpState>,
}

impl PharoClient {
    /// Create a client; the connection handle is built on first use
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: REQUEST_TIMEOUT,
            http: Mutex::new(HttpState::Idle),
        }
    }

    /// Override the whole-request timeout (default 30s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn base_url(&self) -> String {
        self.endpoint.base_url()
    }

    /// Whether a live connection handle is currently held
    pub async fn is_open(&self) -> bool {
        matches!(*self.http.lock().await, HttpState::Open(_))
    }

    /// Release the connection handle
    ///
    /// Returns true only when a live handle was dropped by this call. Safe to
    /// call before any request and any number of times.
    pub async fn close(&self) -> bool {
        let mut state = self.http.lock().await;
        let released = matches!(*state, HttpState::Open(_));
        *state = HttpState::Closed;
        if released {
            info!("Released HTTP client for {}", self.endpoint);
        }
        released
    }

    async fn http(&self) -> Result<Client, Envelope> {
        let mut state = self.http.lock().await;
        match &*state {
            HttpState::Open(client) => Ok(client.clone()),
            HttpState::Closed => Err(Envelope::connection_error("client is closed")),
            HttpState::Idle => {
                let client = Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| Envelope::connection_error(error_chain(&e)))?;
                debug!("Created HTTP client for {}", self.endpoint);
                *state = HttpState::Open(client.clone());
                Ok(client)
            }
        }
    }

    /// Perform one request and normalize the outcome into an envelope
    pub async fn request(&self, verb: Verb, path: &str, params: Option<Params>) -> Envelope {
        let client = match self.http().await {
            Ok(client) => client,
            Err(envelope) => return envelope,
        };

        let url = self.endpoint.url(path);
        debug!("{} {}", verb, url);

        let builder = match verb {
            Verb::Get => {
                let query = params.as_ref().map(to_query).unwrap_or_default();
                if query.is_empty() {
                    client.get(&url)
                } else {
                    client.get(&url).query(&query)
                }
            }
            Verb::Post => match &params {
                Some(body) => client.post(&url).json(body),
                None => client.post(&url),
            },
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", verb, url, e);
                return Envelope::connection_error(error_chain(&e));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Reading body of {} {} failed: {}", verb, url, e);
                return Envelope::connection_error(error_chain(&e));
            }
        };

        if !status.is_success() {
            warn!("{} {} returned {}", verb, url, status);
            return Envelope::http_error(status.as_u16(), &body);
        }

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("{} {} returned a non-envelope body: {}", verb, url, e);
                Envelope::invalid_json(e)
            }
        }
    }

    async fn get(&self, path: &str, params: Params) -> Envelope {
        self.request(Verb::Get, path, Some(params)).await
    }

    /// Evaluate a Smalltalk expression
    pub async fn evaluate(&self, code: &str) -> Envelope {
        self.request(Verb::Post, "/eval", Some(params([("code", code.into())])))
            .await
    }

    pub async fn get_class_source(&self, class_name: &str) -> Envelope {
        self.get("/get-class-source", params([("class_name", class_name.into())]))
            .await
    }

    /// Source of a method; `is_class_method` targets the metaclass side
    pub async fn get_method_source(&self, class_name: &str, method_name: &str, is_class_method: bool) -> Envelope {
        let mut data = params([("class_name", class_name.into()), ("method_name", method_name.into())]);
        // Only sent when set; older servers do not know the flag
        if is_class_method {
            data.insert("is_class_method".to_string(), Value::Bool(true));
        }
        self.get("/get-method-source", data).await
    }

    pub async fn get_class_comment(&self, class_name: &str) -> Envelope {
        self.get("/get-class-comment", params([("class_name", class_name.into())]))
            .await
    }

    pub async fn search_classes_like(&self, class_name_query: &str) -> Envelope {
        self.get(
            "/search-classes-like",
            params([("class_name_query", class_name_query.into())]),
        )
        .await
    }

    pub async fn search_methods_like(&self, method_name_query: &str) -> Envelope {
        self.get(
            "/search-methods-like",
            params([("method_name_query", method_name_query.into())]),
        )
        .await
    }

    pub async fn search_traits_like(&self, trait_name_query: &str) -> Envelope {
        self.get(
            "/search-traits-like",
            params([("trait_name_query", trait_name_query.into())]),
        )
        .await
    }

    /// Implementors of a selector: list of `{class, method, package}`
    pub async fn search_implementors(&self, method_name: &str) -> Envelope {
        self.get("/search-implementors", params([("method_name", method_name.into())]))
            .await
    }

    /// Senders of a selector or users of a symbol
    pub async fn search_references(&self, program_symbol: &str) -> Envelope {
        self.get("/search-references", params([("program_symbol", program_symbol.into())]))
            .await
    }

    pub async fn search_references_to_class(&self, class_name: &str) -> Envelope {
        self.get(
            "/search-references-to-class",
            params([("class_name", class_name.into())]),
        )
        .await
    }

    pub async fn list_packages(&self) -> Envelope {
        self.request(Verb::Get, "/list-packages", None).await
    }

    pub async fn list_classes(&self, package_name: &str) -> Envelope {
        self.get("/list-classes", params([("package_name", package_name.into())]))
            .await
    }

    pub async fn list_extended_classes(&self, package_name: &str) -> Envelope {
        self.get(
            "/list-extended-classes",
            params([("package_name", package_name.into())]),
        )
        .await
    }

    /// Methods of a package as `Class>>#selector` strings
    pub async fn list_methods(&self, package_name: &str) -> Envelope {
        self.get("/list-methods", params([("package_name", package_name.into())]))
            .await
    }

    /// Export a package in Tonel format under `path` (default `/tmp`)
    pub async fn export_package(&self, package_name: &str, path: Option<&str>) -> Envelope {
        let path = path.unwrap_or(DEFAULT_PACKAGE_PATH);
        self.get(
            "/export-package",
            params([("package_name", package_name.into()), ("path", path.into())]),
        )
        .await
    }

    /// Import a Tonel package from `path` (default `/tmp`)
    pub async fn import_package(&self, package_name: &str, path: Option<&str>) -> Envelope {
        let path = path.unwrap_or(DEFAULT_PACKAGE_PATH);
        self.get(
            "/import-package",
            params([("package_name", package_name.into()), ("path", path.into())]),
        )
        .await
    }

    /// Import raw Tonel content (older server protocol)
    pub async fn import_tonel(&self, tonel: &str) -> Envelope {
        self.get("/import-package", params([("tonel", tonel.into())])).await
    }

    pub async fn run_package_test(&self, package_name: &str) -> Envelope {
        self.get("/run-package-test", params([("package_name", package_name.into())]))
            .await
    }

    pub async fn run_class_test(&self, class_name: &str) -> Envelope {
        self.get("/run-class-test", params([("class_name", class_name.into())]))
            .await
    }

    /// Install a Metacello project; `load_groups` is comma-separated
    pub async fn install_project(
        &self,
        project_name: &str,
        repository_url: &str,
        load_groups: Option<&str>,
    ) -> Envelope {
        let mut data = params([
            ("project_name", project_name.into()),
            ("repository_url", repository_url.into()),
        ]);
        if let Some(groups) = load_groups {
            data.insert("load_groups".to_string(), groups.into());
        }
        self.get("/install-project", data).await
    }

    /// Inspect the UI: `world` morphs, `spec` windows or `roassal` canvases
    pub async fn read_screen(&self, target_type: &str, capture_screenshot: bool) -> Envelope {
        self.get(
            "/read-screen",
            params([
                ("target_type", target_type.into()),
                ("capture_screenshot", capture_screenshot.into()),
            ]),
        )
        .await
    }

    pub async fn get_settings(&self) -> Envelope {
        self.request(Verb::Get, "/get-settings", None).await
    }

    /// Merge `settings` into the server configuration
    pub async fn apply_settings(&self, settings: Map<String, Value>) -> Envelope {
        self.request(
            Verb::Post,
            "/apply-settings",
            Some(params([("settings", Value::Object(settings))])),
        )
        .await
    }
}

impl fmt::Debug for PharoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PharoClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Build a parameter mapping from fixed pairs
pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Flatten a mapping into query pairs; `null` entries are dropped
fn to_query(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Display an error with its source chain, e.g. "error sending request: connection refused"
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
