//! Interceptors see every outgoing request right before it reaches the
//! transport. They branch on the metadata the request inherited from its
//! call declaration and may rewrite the request's headers, never the
//! metadata itself.

use crate::{
    descriptor::TagKind,
    io::HttpResponse,
    log_info,
    Result,
};

use super::{Request, Transport};

pub const AUTHORIZATION: &str = "Authorization";
pub const ACCEPT: &str = "Accept";

pub trait Interceptor: Send + Sync {
    /// Inspect and possibly modify `request`, then hand it over with
    /// `next.proceed`. The response is returned to the previous interceptor.
    fn intercept(&self, request: Request, next: Next<'_>) -> Result<HttpResponse>;
}

/// Remaining part of the chain for a single request.
pub struct Next<'a> {
    interceptors: &'a [Box<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub fn new(interceptors: &'a [Box<dyn Interceptor>], transport: &'a dyn Transport) -> Self {
        Next {
            interceptors,
            transport,
        }
    }

    pub fn proceed(self, request: Request) -> Result<HttpResponse> {
        match self.interceptors.split_first() {
            Some((interceptor, rest)) => {
                interceptor.intercept(request, Next::new(rest, self.transport))
            }
            None => self.transport.send(request),
        }
    }
}

/// Adds `Authorization: Bearer <token>` to requests declared with an
/// access token tag. Requests without one pass through untouched.
///
/// An empty token still produces the header, with an empty credential.
pub struct AccessTokenInterceptor;

impl AccessTokenInterceptor {
    /// Returns whether the request was tagged. Overwrites any previous
    /// `Authorization` value, so applying it again changes nothing.
    pub fn authorize(request: &mut Request) -> bool {
        let token = request
            .metadata()
            .and_then(|metadata| metadata.get(TagKind::AccessToken))
            .map(|tag| tag.value().to_string());
        match token {
            Some(token) => {
                request.set_header(AUTHORIZATION, &format!("Bearer {}", token));
                true
            }
            None => false,
        }
    }
}

impl Interceptor for AccessTokenInterceptor {
    fn intercept(&self, mut request: Request, next: Next<'_>) -> Result<HttpResponse> {
        AccessTokenInterceptor::authorize(&mut request);
        next.proceed(request)
    }
}

/// Replaces the `Accept` header with the media type declared on the call.
pub struct MediaTypeInterceptor;

impl Interceptor for MediaTypeInterceptor {
    fn intercept(&self, mut request: Request, next: Next<'_>) -> Result<HttpResponse> {
        let media_type = request
            .metadata()
            .and_then(|metadata| metadata.get(TagKind::Accept))
            .map(|tag| tag.value().to_string());
        if let Some(media_type) = media_type {
            request.set_header(ACCEPT, &media_type);
        }
        next.proceed(request)
    }
}

/// Logs each request and the status it got back. Credentials are never
/// logged, only whether the request carries them.
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn intercept(&self, request: Request, next: Next<'_>) -> Result<HttpResponse> {
        let label = request
            .metadata()
            .and_then(|metadata| metadata.get(TagKind::Label))
            .map(|tag| tag.value().to_string())
            .unwrap_or_else(|| "-".to_string());
        let method = *request.method();
        let url = request.url().to_string();
        log_info!(
            "[{}] {} {} authorized: {}",
            label,
            method,
            url,
            request.headers().contains(AUTHORIZATION)
        );
        let response = next.proceed(request)?;
        log_info!("[{}] {} {} status: {}", label, method, url, response.status);
        Ok(response)
    }
}
