//! Turns a call declaration plus the values supplied at the call site into
//! an outgoing `Request`.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::{
    api_defaults, codec,
    descriptor::{CallDescriptor, ParamLocation, Segment},
    error::CallError,
    http::{Headers, Request},
    Result,
};

// RFC 3986 unreserved characters are left as they are.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Argument values for one call, by slot. Empty slots are allowed and only
/// rejected when a path placeholder is bound to them.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    values: Vec<Option<String>>,
    body: Option<String>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg<V: ToString>(mut self, value: V) -> Self {
        self.values.push(Some(value.to_string()));
        self
    }

    pub fn opt_arg<V: ToString>(mut self, value: Option<V>) -> Self {
        self.values.push(value.map(|v| v.to_string()));
        self
    }

    /// Leaves the next slot empty.
    pub fn skip(mut self) -> Self {
        self.values.push(None);
        self
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(codec::encode(body)?);
        Ok(self)
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.values.get(slot).and_then(|value| value.as_deref())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds requests against a base URL. Holds no per-call state, so one
/// factory serves any number of concurrent calls.
#[derive(Clone, Debug)]
pub struct RequestFactory {
    base_url: String,
    default_headers: Headers,
}

impl RequestFactory {
    pub fn new(base_url: &str, default_headers: Headers) -> Self {
        RequestFactory {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        }
    }

    /// Factory sending the JSON media type and user agent expected by the
    /// GitHub REST API.
    pub fn github(base_url: &str) -> Self {
        let mut headers = Headers::new();
        headers.set("Accept", api_defaults::GITHUB_MEDIA_TYPE);
        headers.set("User-Agent", api_defaults::USER_AGENT);
        RequestFactory::new(base_url, headers)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build(&self, descriptor: &CallDescriptor, args: &Arguments) -> Result<Request> {
        let mut url = self.base_url.clone();
        url.push_str(&resolve_path(descriptor, args)?);
        let query = resolve_query(descriptor, args);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = self.default_headers.clone();
        if args.body().is_some() {
            headers.set("Content-Type", api_defaults::JSON_CONTENT_TYPE);
        }
        let mut builder = Request::builder()
            .method(*descriptor.method())
            .url(url)
            .headers(headers);
        if let Some(body) = args.body() {
            builder = builder.body(body);
        }
        let request = builder
            .metadata(Arc::clone(descriptor.metadata()))
            .build()?;
        Ok(request)
    }
}

fn resolve_path(descriptor: &CallDescriptor, args: &Arguments) -> Result<String> {
    let mut path = String::with_capacity(descriptor.template().len());
    for segment in descriptor.segments() {
        match segment {
            Segment::Literal(text) => path.push_str(text),
            Segment::Placeholder(name) => {
                let value = descriptor
                    .binding(name, ParamLocation::Path)
                    .and_then(|binding| args.get(binding.slot()))
                    .ok_or_else(|| {
                        CallError::MissingArgument(format!(
                            "{} for {} {}",
                            name,
                            descriptor.method(),
                            descriptor.template()
                        ))
                    })?;
                path.push_str(&encode(value));
            }
        }
    }
    Ok(path)
}

fn resolve_query(descriptor: &CallDescriptor, args: &Arguments) -> String {
    descriptor
        .bindings()
        .iter()
        .filter(|binding| binding.location() == ParamLocation::Query)
        .filter_map(|binding| {
            args.get(binding.slot())
                .map(|value| format!("{}={}", encode(binding.name()), encode(value)))
        })
        .collect::<Vec<String>>()
        .join("&")
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::*;
    use crate::descriptor::{Registry, Tag, TagKind};
    use crate::error;
    use crate::http::Method;

    fn factory() -> RequestFactory {
        RequestFactory::github("https://api.github.com/")
    }

    #[test]
    fn test_build_resolves_placeholder() {
        let descriptor = CallDescriptor::get("/users/{username}/repos")
            .path_param("username", 0)
            .build()
            .unwrap();
        let request = factory()
            .build(&descriptor, &Arguments::new().arg("watabee"))
            .unwrap();
        assert_eq!("https://api.github.com/users/watabee/repos", request.url());
        assert_eq!(&Method::GET, request.method());
        assert!(!request.headers().contains("Authorization"));
        assert!(Arc::ptr_eq(
            descriptor.metadata(),
            request.metadata().unwrap()
        ));
    }

    #[test]
    fn test_build_without_placeholders_keeps_credential_tag() {
        let descriptor = CallDescriptor::get("/user/repos")
            .tag(Tag::access_token("TOKEN"))
            .build()
            .unwrap();
        let request = factory().build(&descriptor, &Arguments::new()).unwrap();
        assert_eq!("https://api.github.com/user/repos", request.url());
        let metadata = request.metadata().unwrap();
        assert!(Arc::ptr_eq(descriptor.metadata(), metadata));
        assert_eq!("TOKEN", metadata.get(TagKind::AccessToken).unwrap().value());
        // Credentials are the interceptor's job.
        assert!(!request.headers().contains("Authorization"));
    }

    #[test]
    fn test_build_escapes_path_values() {
        let descriptor = CallDescriptor::get("/repos/{owner}/{repo}")
            .path_param("owner", 0)
            .path_param("repo", 1)
            .build()
            .unwrap();
        let request = factory()
            .build(&descriptor, &Arguments::new().arg("a b").arg("x/y?z"))
            .unwrap();
        assert_eq!(
            "https://api.github.com/repos/a%20b/x%2Fy%3Fz",
            request.url()
        );
    }

    #[test]
    fn test_build_binds_slots_not_declaration_order() {
        let descriptor = CallDescriptor::get("/repos/{owner}/{repo}")
            .path_param("repo", 0)
            .path_param("owner", 1)
            .build()
            .unwrap();
        let request = factory()
            .build(&descriptor, &Arguments::new().arg("tagcall").arg("watabee"))
            .unwrap();
        assert_eq!(
            "https://api.github.com/repos/watabee/tagcall",
            request.url()
        );
    }

    #[test]
    fn test_build_missing_argument() {
        let descriptor = CallDescriptor::get("/users/{username}/repos")
            .path_param("username", 0)
            .build()
            .unwrap();
        let err = factory()
            .build(&descriptor, &Arguments::new())
            .unwrap_err();
        assert!(matches!(
            error::kind(&err),
            Some(CallError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_build_query_parameters() {
        let descriptor = CallDescriptor::get("/user/repos")
            .query_param("per_page", 0)
            .query_param("sort", 1)
            .build()
            .unwrap();
        let request = factory()
            .build(&descriptor, &Arguments::new().arg(50).arg("full name"))
            .unwrap();
        assert_eq!(
            "https://api.github.com/user/repos?per_page=50&sort=full%20name",
            request.url()
        );
    }

    #[test]
    fn test_build_omits_empty_query_parameters() {
        let descriptor = CallDescriptor::get("/user/repos")
            .query_param("per_page", 0)
            .query_param("sort", 1)
            .build()
            .unwrap();
        let request = factory()
            .build(&descriptor, &Arguments::new().skip().arg("updated"))
            .unwrap();
        assert_eq!("https://api.github.com/user/repos?sort=updated", request.url());
        let request = factory().build(&descriptor, &Arguments::new()).unwrap();
        assert_eq!("https://api.github.com/user/repos", request.url());
    }

    #[test]
    fn test_build_applies_default_headers() {
        let descriptor = CallDescriptor::get("/user/repos").build().unwrap();
        let request = factory().build(&descriptor, &Arguments::new()).unwrap();
        assert_eq!(
            api_defaults::GITHUB_MEDIA_TYPE,
            request.headers().get("accept").unwrap()
        );
        assert_eq!(
            api_defaults::USER_AGENT,
            request.headers().get("user-agent").unwrap()
        );
        assert!(!request.headers().contains("content-type"));
    }

    #[test]
    fn test_build_with_body_sets_content_type() {
        #[derive(Serialize)]
        struct NewRepository {
            name: String,
            private: bool,
        }
        let descriptor = CallDescriptor::post("/user/repos").build().unwrap();
        let args = Arguments::new()
            .with_body(&NewRepository {
                name: "tagcall".to_string(),
                private: true,
            })
            .unwrap();
        let request = factory().build(&descriptor, &args).unwrap();
        assert_eq!(&Method::POST, request.method());
        assert_eq!(r#"{"name":"tagcall","private":true}"#, request.body().unwrap());
        assert_eq!(
            api_defaults::JSON_CONTENT_TYPE,
            request.headers().get("Content-Type").unwrap()
        );
    }

    #[derive(Debug, PartialEq, Eq, Hash)]
    enum Op {
        Public,
        Private,
    }

    #[test]
    fn test_concurrent_builds_keep_their_descriptor_metadata() {
        let registry = Arc::new(
            Registry::new(vec![
                (
                    Op::Public,
                    CallDescriptor::get("/users/{username}/repos").path_param("username", 0),
                ),
                (
                    Op::Private,
                    CallDescriptor::get("/user/repos").tag(Tag::access_token("TOKEN")),
                ),
            ])
            .unwrap(),
        );
        let factory = Arc::new(factory());
        let mut threads = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            let factory = factory.clone();
            threads.push(thread::spawn(move || {
                let (op, args) = if i % 2 == 0 {
                    (Op::Public, Arguments::new().arg(format!("user{}", i)))
                } else {
                    (Op::Private, Arguments::new())
                };
                let descriptor = registry.get(&op).unwrap();
                let request = factory.build(descriptor, &args).unwrap();
                assert!(Arc::ptr_eq(
                    descriptor.metadata(),
                    request.metadata().unwrap()
                ));
                assert_eq!(
                    op == Op::Private,
                    request
                        .metadata()
                        .unwrap()
                        .contains(TagKind::AccessToken)
                );
            }));
        }
        for thread in threads {
            thread.join().unwrap();
        }
    }
}
