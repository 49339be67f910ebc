use crate::{http::Headers, http::Request, Result};

/// A trait for the HTTP protocol. Implementors accept a `Request` that wraps
/// headers, payload, HTTP method and the metadata of the call that produced
/// it. Clients can do HTTP calls against a remote server, possibly through a
/// chain of interceptors, or mock the responses for testing purposes.
pub trait HttpRunner {
    fn run(&self, request: Request) -> Result<HttpResponse>;
}

/// Adapts lower level HTTP outputs to a common Response.
#[derive(Clone, Debug, Builder)]
pub struct HttpResponse {
    #[builder(default)]
    pub status: i32,
    #[builder(default)]
    pub body: String,
    /// Optional headers, names in lowercase.
    #[builder(setter(into, strip_option), default)]
    pub headers: Option<Headers>,
}

impl HttpResponse {
    pub fn builder() -> HttpResponseBuilder {
        HttpResponseBuilder::default()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(key))
            .map(|s| s.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
