#[cfg(test)]
pub mod utils {
    use crate::{
        config::ConfigProperties,
        descriptor::Metadata,
        error::{self, CallError},
        http::{self, Headers, Request, Transport},
        io::{HttpResponse, HttpRunner},
        Result,
    };
    use std::{
        cell::{Ref, RefCell},
        fs::File,
        io::Read,
        sync::Arc,
    };

    pub fn get_fixture(filename: &str) -> String {
        let contracts_path = format!("contracts/github/{}", filename);
        let mut file = File::open(contracts_path).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        contents
    }

    /// Records the last request it receives and replies with the queued
    /// responses, last one first.
    pub struct MockRunner<R> {
        responses: RefCell<Vec<R>>,
        headers: RefCell<Headers>,
        url: RefCell<String>,
        metadata: RefCell<Option<Arc<Metadata>>>,
        pub http_method: RefCell<Vec<http::Method>>,
        pub run_count: RefCell<u32>,
        request_body: RefCell<String>,
    }

    impl<R> MockRunner<R> {
        pub fn new(responses: Vec<R>) -> Self {
            Self {
                responses: RefCell::new(responses),
                headers: RefCell::new(Headers::new()),
                url: RefCell::new(String::new()),
                metadata: RefCell::new(None),
                http_method: RefCell::new(Vec::new()),
                run_count: RefCell::new(0),
                request_body: RefCell::new(String::new()),
            }
        }

        pub fn url(&self) -> Ref<String> {
            self.url.borrow()
        }

        pub fn headers(&self) -> Ref<Headers> {
            self.headers.borrow()
        }

        pub fn metadata(&self) -> Ref<Option<Arc<Metadata>>> {
            self.metadata.borrow()
        }

        pub fn request_body(&self) -> Ref<String> {
            self.request_body.borrow()
        }
    }

    impl Transport for MockRunner<HttpResponse> {
        fn send(&self, request: Request) -> Result<HttpResponse> {
            self.url.replace(request.url().to_string());
            self.headers.replace(request.headers().clone());
            self.metadata.replace(request.metadata().cloned());
            self.request_body
                .replace(request.body().unwrap_or_default().to_string());
            self.http_method.borrow_mut().push(*request.method());
            *self.run_count.borrow_mut() += 1;
            let response = self.responses.borrow_mut().pop().unwrap();
            match response.status {
                // Just for testing purposes, if the test client sets a status
                // code of -1 we return a HTTP transport error.
                -1 => Err(CallError::TransportError(response.body).into()),
                0 => Err(error::gen(&response.body)),
                _ => Ok(response),
            }
        }
    }

    impl HttpRunner for MockRunner<HttpResponse> {
        fn run(&self, request: Request) -> Result<HttpResponse> {
            self.send(request)
        }
    }

    pub struct ConfigMock {
        access_token: String,
        per_page: Option<u32>,
    }

    impl ConfigMock {
        pub fn new() -> Self {
            ConfigMock {
                access_token: "1234".to_string(),
                per_page: None,
            }
        }

        pub fn with_access_token(self, access_token: &str) -> Self {
            ConfigMock {
                access_token: access_token.to_string(),
                ..self
            }
        }

        pub fn with_per_page(self, per_page: u32) -> Self {
            ConfigMock {
                per_page: Some(per_page),
                ..self
            }
        }
    }

    impl ConfigProperties for ConfigMock {
        fn username(&self) -> &str {
            "watabee"
        }
        fn access_token(&self) -> &str {
            &self.access_token
        }
        fn per_page(&self) -> Option<u32> {
            self.per_page
        }
    }
}
