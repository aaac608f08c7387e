use super::response::RepoCodeSummary;
use crate::archive::ArchiveDecoder;
use crate::cache::RepoCache;
use crate::error::Result;
use crate::github::{GitHubApi, RepoRef};
use tracing::info;

/// Downloads, decodes and caches a repository's default branch
///
/// Only file paths are returned; decoded contents are handed to the cache.
pub(crate) async fn fetch_repo_code(
    github: &dyn GitHubApi,
    decoder: &ArchiveDecoder,
    cache: &RepoCache,
    repo: &RepoRef,
) -> Result<RepoCodeSummary> {
    let metadata = github.get_repo_metadata(&repo.owner, &repo.name).await?;
    let archive = github
        .get_archive(&repo.owner, &repo.name, &metadata.default_branch)
        .await?;
    info!(
        "Downloaded {} ({} bytes, branch {})",
        repo,
        archive.len(),
        metadata.default_branch
    );

    let structure = decoder.decode(archive).await?;
    let paths: Vec<String> = structure.iter().map(|entry| entry.path.clone()).collect();

    let repo_id = repo.to_string();
    cache.put(&repo_id, structure).await;
    info!(
        "Cached {} files for {} for {:?}",
        paths.len(),
        repo_id,
        cache.ttl()
    );

    Ok(RepoCodeSummary {
        repo: repo_id,
        structure: paths,
    })
}
