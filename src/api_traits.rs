use crate::{github::Repository, Result};

pub trait RepositoryInfo {
    /// Public repositories of `username`.
    fn list(&self, username: &str) -> Result<Vec<Repository>>;
    /// Repositories visible to the owner of the configured access token.
    fn list_authenticated(&self) -> Result<Vec<Repository>>;
    fn get(&self, owner: &str, repo: &str) -> Result<Repository>;
}
