//! Saving a finished job's output to disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::JobClient;
use crate::error::ConvertError;

/// Downloads `url` into `dir`, creating the directory if needed, and
/// returns the written path.
pub async fn save_artifact(
    client: &JobClient,
    url: &str,
    dir: &Path,
) -> Result<PathBuf, ConvertError> {
    let artifact = client.fetch_artifact(url).await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(sanitize_file_name(&artifact.file_name));
    tokio::fs::write(&path, &artifact.bytes).await?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact saved");
    Ok(path)
}

/// Keeps only the final component of a server-supplied name.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => "download".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("out.zip"), "out.zip");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(r"..\evil.exe"), "evil.exe");
        assert_eq!(sanitize_file_name(".."), "download");
        assert_eq!(sanitize_file_name("dir/"), "download");
    }

    #[tokio::test]
    async fn save_artifact_writes_into_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/job-1/audio.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested/out");
        let client = JobClient::with_base_url(&server.uri());
        let url = format!("{}/files/job-1/audio.mp3", server.uri());

        let saved = save_artifact(&client, &url, &out_dir).await.unwrap();
        assert_eq!(saved, out_dir.join("audio.mp3"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"ID3");
    }

    #[tokio::test]
    async fn save_artifact_propagates_download_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = JobClient::with_base_url(&server.uri());
        let err = save_artifact(&client, &format!("{}/files/x", server.uri()), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Download(_)));
    }
}
