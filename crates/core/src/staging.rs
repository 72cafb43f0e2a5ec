//! Writing uploads to the staging area.

use crate::error::{ConvertError, CoreResult};
use crate::paths::StagedJob;
use std::path::Path;

/// Persists upload bytes at a job's input path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStager;

impl FileStager {
    pub fn new() -> Self {
        Self
    }

    /// Ensures the job's input and output directories exist, then writes `bytes` to its input
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Staging`] if a directory cannot be created or the write does not
    /// complete. Nothing is retried.
    pub async fn stage(&self, job: &StagedJob, bytes: &[u8]) -> CoreResult<()> {
        for path in [job.input_path(), job.output_path()] {
            if let Some(parent) = path.parent() {
                ensure_dir(parent).await?;
            }
        }

        tokio::fs::write(job.input_path(), bytes)
            .await
            .map_err(|e| {
                ConvertError::Staging(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to write upload to {}: {}",
                        job.input_path().display(),
                        e
                    ),
                ))
            })?;

        tracing::debug!(
            job_id = %job.id(),
            path = %job.input_path().display(),
            bytes = bytes.len(),
            "staged upload"
        );
        Ok(())
    }
}

/// Creates `dir` and any missing parents. A directory that already exists, including one created
/// concurrently by another request, counts as success.
pub async fn ensure_dir(dir: &Path) -> CoreResult<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ConvertError::Staging(std::io::Error::new(
            e.kind(),
            format!("Failed to create directory {}: {}", dir.display(), e),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::NormalizedFormat;
    use crate::paths::PathNamer;
    use std::fs;
    use tempfile::TempDir;

    fn job_in(temp: &TempDir, file_name: &str) -> StagedJob {
        let namer = PathNamer::new(
            temp.path().join("uploads").join("api"),
            temp.path().join("output").join("api"),
        );
        namer.name(file_name, &NormalizedFormat::new("pdf").unwrap())
    }

    #[tokio::test]
    async fn test_stage_writes_exact_bytes() {
        let temp = TempDir::new().unwrap();
        let job = job_in(&temp, "scan.tiff");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

        FileStager::new().stage(&job, &bytes).await.unwrap();

        assert_eq!(fs::read(job.input_path()).unwrap(), bytes);
        assert!(job.output_path().parent().unwrap().is_dir());
        assert!(!job.output_path().exists());
    }

    #[tokio::test]
    async fn test_stage_empty_upload() {
        let temp = TempDir::new().unwrap();
        let job = job_in(&temp, "empty.txt");

        FileStager::new().stage(&job, &[]).await.unwrap();

        assert_eq!(fs::read(job.input_path()).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        ensure_dir(&dir).await.unwrap();
        ensure_dir(&dir).await.unwrap();

        assert!(dir.is_dir());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_staging_shares_directories() {
        let temp = TempDir::new().unwrap();
        let mut handles = Vec::new();

        for i in 0..16u8 {
            let job = job_in(&temp, "same.png");
            handles.push(tokio::spawn(async move {
                let staged = FileStager::new().stage(&job, &[i; 64]).await;
                staged.map(|_| job)
            }));
        }

        let mut jobs = Vec::new();
        for handle in handles {
            jobs.push(handle.await.unwrap().unwrap());
        }

        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(fs::read(job.input_path()).unwrap(), vec![i as u8; 64]);
        }
    }

    #[tokio::test]
    async fn test_stage_fails_when_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("uploads"), b"not a directory").unwrap();
        let job = job_in(&temp, "photo.png");

        let err = FileStager::new().stage(&job, b"data").await.unwrap_err();

        assert!(matches!(err, ConvertError::Staging(_)));
        assert_eq!(err.client_message(), "io_error");
    }
}
