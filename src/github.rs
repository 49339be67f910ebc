use crate::api_traits::RepositoryInfo;
use crate::config::ConfigProperties;
use crate::descriptor::{CallDescriptor, Declaration, Registry, Tag};
use crate::error::{AddContext, CallError};
use crate::invocation::{Arguments, RequestFactory};
use crate::io::HttpRunner;
use crate::{codec, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

/// Operations declared by the GitHub client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GithubCall {
    Repositories,
    AuthenticatedRepositories,
    Repository,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Repository {
    pub full_name: String,
    #[serde(rename = "private")]
    pub is_private: bool,
    pub html_url: Option<String>,
    pub description: Option<String>,
}

/// GitHub REST client. Each method is backed by one declared call; which
/// calls carry the access token is decided here, once, and not at the call
/// sites.
pub struct Github<R> {
    calls: Registry<GithubCall>,
    requests: RequestFactory,
    per_page: Option<u32>,
    runner: Arc<R>,
}

fn declarations(access_token: &str) -> Vec<(GithubCall, Declaration)> {
    vec![
        // https://docs.github.com/en/rest/repos/repos#list-repositories-for-a-user
        (
            GithubCall::Repositories,
            CallDescriptor::get("/users/{username}/repos")
                .path_param("username", 0)
                .query_param("per_page", 1)
                .tag(Tag::label("repositories")),
        ),
        // https://docs.github.com/en/rest/repos/repos#list-repositories-for-the-authenticated-user
        (
            GithubCall::AuthenticatedRepositories,
            CallDescriptor::get("/user/repos")
                .query_param("per_page", 0)
                .tag(Tag::access_token(access_token))
                .tag(Tag::label("authenticatedRepositories")),
        ),
        // https://docs.github.com/en/rest/repos/repos#get-a-repository
        (
            GithubCall::Repository,
            CallDescriptor::get("/repos/{owner}/{repo}")
                .path_param("owner", 0)
                .path_param("repo", 1)
                .tag(Tag::access_token(access_token))
                .tag(Tag::label("repository")),
        ),
    ]
}

impl<R: HttpRunner> Github<R> {
    /// Declares all calls. Inconsistent declarations fail here.
    pub fn new(config: &impl ConfigProperties, runner: Arc<R>) -> Result<Self> {
        let calls = Registry::new(declarations(config.access_token()))?;
        Ok(Github {
            calls,
            requests: RequestFactory::github(config.base_url()),
            per_page: config.per_page(),
            runner,
        })
    }

    pub fn get_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.call(
            GithubCall::Repositories,
            Arguments::new().arg(username).opt_arg(self.per_page),
        )
    }

    pub fn get_authenticated_repositories(&self) -> Result<Vec<Repository>> {
        self.call(
            GithubCall::AuthenticatedRepositories,
            Arguments::new().opt_arg(self.per_page),
        )
    }

    pub fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.call(GithubCall::Repository, Arguments::new().arg(owner).arg(repo))
    }

    fn call<T: DeserializeOwned>(&self, id: GithubCall, args: Arguments) -> Result<T> {
        let descriptor = self.calls.get(&id)?;
        descriptor.check_arguments(&args)?;
        let request = self.requests.build(descriptor, &args)?;
        let url = request.url().to_string();
        let response = self.runner.run(request)?;
        if !response.is_success() {
            return Err(CallError::TransportError(format!(
                "{} {} returned status {}: {}",
                descriptor.method(),
                url,
                response.status,
                response.body
            ))
            .into());
        }
        codec::decode::<T>(&response).err_context(format!("decoding response from {}", url))
    }
}

impl<R: HttpRunner> RepositoryInfo for Github<R> {
    fn list(&self, username: &str) -> Result<Vec<Repository>> {
        self.get_repositories(username)
    }

    fn list_authenticated(&self) -> Result<Vec<Repository>> {
        self.get_authenticated_repositories()
    }

    fn get(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.get_repository(owner, repo)
    }
}
