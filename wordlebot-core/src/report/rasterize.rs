// File: src/report/rasterize.rs
//
// Shells out to a LibreOffice-compatible `soffice` binary to turn the report
// spreadsheet into a PNG. The child process is always awaited to completion.
// soffice always names its output after the artifact; the result is moved to
// the requested image path afterwards.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::Error;
use wordlebot_common::traits::api::Rasterizer;

pub struct LibreOfficeRasterizer {
    binary: String,
}

impl LibreOfficeRasterizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Where `soffice --convert-to png` puts the image for `artifact`.
    pub fn converted_image(artifact: &Path) -> PathBuf {
        artifact.with_extension("png")
    }
}

#[async_trait]
impl Rasterizer for LibreOfficeRasterizer {
    async fn rasterize(&self, artifact: &Path, image: &Path) -> Result<PathBuf, Error> {
        let out_dir = match artifact.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let converted = Self::converted_image(artifact);

        // An earlier conversion's output must not pass for this one.
        for stale in [converted.as_path(), image] {
            if tokio::fs::try_exists(stale).await.unwrap_or(false) {
                debug!("Removing stale image {}", stale.display());
                tokio::fs::remove_file(stale).await?;
            }
        }

        info!("Rasterizing {} with '{}'", artifact.display(), self.binary);
        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--convert-to")
            .arg("png")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(artifact)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Rasterization(format!("failed to start '{}': {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("'{}' exited with {} => {}", self.binary, output.status, stderr.trim());
            return Err(Error::Rasterization(format!(
                "'{}' exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        debug!("rasterizer stdout => {}", String::from_utf8_lossy(&output.stdout).trim());

        if !converted.exists() {
            return Err(Error::Rasterization(format!(
                "'{}' succeeded but {} was not produced",
                self.binary,
                converted.display()
            )));
        }

        if converted != image {
            tokio::fs::rename(&converted, image).await.map_err(|e| {
                Error::Rasterization(format!(
                    "could not move {} to {}: {e}",
                    converted.display(),
                    image.display()
                ))
            })?;
        }

        Ok(image.to_path_buf())
    }
}
