use std::{io::Write, sync::Arc};

use crate::{api_traits::RepositoryInfo, Result};

/// Fetches the public repositories of `username`, then the ones visible to
/// the configured token, and writes how many each call returned.
pub fn execute<W: Write>(
    remote: Arc<dyn RepositoryInfo>,
    username: &str,
    mut writer: W,
) -> Result<()> {
    let repositories = remote.list(username)?;
    let authenticated_repositories = remote.list_authenticated()?;

    writeln!(writer, "repositories.size = {}", repositories.len())?;
    writeln!(
        writer,
        "authenticatedRepositories.size = {}",
        authenticated_repositories.len()
    )?;
    Ok(())
}
