use crate::config::ConfigProperties;
use crate::descriptor::Metadata;
use crate::error::CallError;
use crate::io::{HttpResponse, HttpRunner};
use crate::{api_defaults, codec, log_debug, Result};
use serde::Serialize;
use std::collections::{hash_map, HashMap};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use ureq::typestate::{WithBody, WithoutBody};

pub mod interceptor;

use interceptor::{Interceptor, Next};

/// Sends a fully prepared request. This is the end of the interceptor chain.
pub trait Transport {
    fn send(&self, request: Request) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: Request) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: Request) -> Result<HttpResponse> {
        self.as_ref().send(request)
    }
}

/// HTTP transport backed by a `ureq` agent. Non successful status codes are
/// returned as regular responses; only I/O failures are errors.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        UreqTransport { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        UreqTransport::new(Some(Duration::from_secs(
            api_defaults::DEFAULT_TIMEOUT_SECONDS,
        )))
    }
}

fn with_headers<B>(request: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    headers
        .iter()
        .fold(request, |req, (key, value)| req.header(key.as_str(), value.as_str()))
}

fn send_empty(
    request: ureq::RequestBuilder<WithoutBody>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    request.call()
}

fn send_body(
    request: ureq::RequestBuilder<WithBody>,
    body: Option<&str>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => request.send(body.as_bytes()),
        None => request.send_empty(),
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: Request) -> Result<HttpResponse> {
        let url = request.url();
        let headers = request.headers();
        let body = request.body();
        let result = match request.method() {
            Method::GET => send_empty(with_headers(self.agent.get(url), headers)),
            Method::DELETE => send_empty(with_headers(self.agent.delete(url), headers)),
            Method::POST => send_body(with_headers(self.agent.post(url), headers), body),
            Method::PUT => send_body(with_headers(self.agent.put(url), headers), body),
            Method::PATCH => send_body(with_headers(self.agent.patch(url), headers), body),
        };
        let mut response =
            result.map_err(|err| CallError::TransportError(format!("{}: {}", url, err)))?;
        let status = response.status().as_u16() as i32;
        // Grab headers, names are normalized to lowercase.
        let response_headers =
            response
                .headers()
                .iter()
                .fold(Headers::new(), |mut headers, (name, value)| {
                    headers.set(name.as_str(), value.to_str().unwrap_or_default());
                    headers
                });
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| CallError::TransportError(format!("{}: {}", url, err)))?;
        log_debug!("{} {} returned {}", request.method(), url, status);
        let response = HttpResponse::builder()
            .status(status)
            .body(body)
            .headers(response_headers)
            .build()?;
        Ok(response)
    }
}

/// Runs every request through the registered interceptors, in registration
/// order, before handing it to the transport.
pub struct Client<T> {
    interceptors: Vec<Box<dyn Interceptor>>,
    transport: T,
}

impl Client<UreqTransport> {
    pub fn new(config: &impl ConfigProperties) -> Self {
        let timeout = config.timeout_seconds().map(Duration::from_secs);
        Client::with_transport(UreqTransport::new(timeout))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Client {
            interceptors: Vec::new(),
            transport,
        }
    }

    pub fn with_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn interceptors(&self) -> usize {
        self.interceptors.len()
    }
}

impl<T: Transport> HttpRunner for Client<T> {
    fn run(&self, request: Request) -> Result<HttpResponse> {
        Next::new(&self.interceptors, &self.transport).proceed(request)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers(HashMap<String, String>);

/// Header names are case insensitive. They are stored lowercased so a later
/// `set` of the same name replaces the earlier value instead of duplicating it.
impl Headers {
    pub fn new() -> Self {
        Headers(HashMap::new())
    }

    pub fn set<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.as_ref().to_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(&key.to_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<String, String> {
        self.0.iter()
    }
}

#[derive(Builder, Debug)]
#[builder(pattern = "owned")]
pub struct Request {
    #[builder(setter(into, strip_option), default)]
    body: Option<String>,
    #[builder(default)]
    headers: Headers,
    #[builder(default)]
    method: Method,
    #[builder(setter(into))]
    url: String,
    #[builder(setter(strip_option), default)]
    metadata: Option<Arc<Metadata>>,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn new(url: &str, method: Method) -> Self {
        Request {
            body: None,
            headers: Headers::new(),
            method,
            url: url.to_string(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Arc<Metadata>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Serializes `body` as JSON and marks the request accordingly.
    pub fn with_json_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(codec::encode(body)?);
        self.set_header("Content-Type", api_defaults::JSON_CONTENT_TYPE);
        Ok(self)
    }

    pub fn metadata(&self) -> Option<&Arc<Metadata>> {
        self.metadata.as_ref()
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.set(key, value);
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::PATCH => write!(f, "PATCH"),
            Method::DELETE => write!(f, "DELETE"),
        }
    }
}
