//! Durable command-file write with read-back validation
//!
//! The vendor executable reads the command file on its own schedule;
//! a half-written or stale file makes it process the wrong line count
//! (an observed failure mode under OS write-back delays). So the file
//! is flushed and synced, then polled until the on-disk bytes match
//! the expected content exactly. No trimming: trailing bytes change
//! the line count the executor validates against.

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::fiscal::{FiscalError, FiscalResult};

/// Write `content`, force it to stable storage, then verify it landed.
pub async fn write_and_verify(
    path: &Path,
    content: &[u8],
    timeout: Duration,
    poll_interval: Duration,
) -> FiscalResult<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    verify_on_disk(path, content, timeout, poll_interval).await
}

/// Poll-read `path` until its bytes equal `content` or the budget runs
/// out. Separate from [`write_and_verify`] so tests can race it
/// against a delayed writer.
pub async fn verify_on_disk(
    path: &Path,
    content: &[u8],
    timeout: Duration,
    poll_interval: Duration,
) -> FiscalResult<()> {
    let started = Instant::now();
    let mut last_len = 0usize;

    loop {
        match tokio::fs::read(path).await {
            Ok(on_disk) if on_disk == content => {
                debug!(
                    file = %path.display(),
                    bytes = content.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "command file verified"
                );
                return Ok(());
            }
            Ok(on_disk) => {
                last_len = on_disk.len();
                debug!(
                    expected = content.len(),
                    actual = last_len,
                    "command file not settled yet"
                );
            }
            // Transient read errors count against the same budget
            Err(e) => warn!(error = %e, "command file read failed during validation"),
        }

        if started.elapsed() >= timeout {
            return Err(FiscalError::WriteValidation {
                expected_bytes: content.len(),
                actual_bytes: last_len,
                file: path.to_path_buf(),
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_roundtrip_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factura_actual.txt");
        let content = b"iS*Consumidor Final\niR*V000000000\n3\n101".to_vec();

        write_and_verify(&path, &content, Duration::from_secs(1), POLL)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_stale_content_times_out_with_byte_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factura_actual.txt");
        std::fs::write(&path, b"old").unwrap();

        let err = verify_on_disk(&path, b"expected content", Duration::from_millis(80), POLL)
            .await
            .unwrap_err();

        match err {
            FiscalError::WriteValidation {
                expected_bytes,
                actual_bytes,
                ..
            } => {
                assert_eq!(expected_bytes, 16);
                assert_eq!(actual_bytes, 3);
            }
            other => panic!("expected WriteValidation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delayed_write_is_awaited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factura_actual.txt");
        std::fs::write(&path, b"stale").unwrap();

        let delayed_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            tokio::fs::write(&delayed_path, b"settled").await.unwrap();
        });

        verify_on_disk(&path, b"settled", Duration::from_secs(2), POLL)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_counts_against_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nunca.txt");

        let err = verify_on_disk(&path, b"x", Duration::from_millis(60), POLL)
            .await
            .unwrap_err();
        assert!(matches!(err, FiscalError::WriteValidation { .. }));
    }
}
