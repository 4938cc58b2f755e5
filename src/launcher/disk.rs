//! Lazy disk image provisioning through `qemu-img`.

use std::path::Path;
use std::process::Stdio;

use log::{debug, info};
use tokio::process::Command;

use crate::launcher::LaunchError;

/// Make sure the disk image exists, creating it with `qemu-img create`
/// when it does not. Returns `true` if a new image was created.
pub async fn ensure_disk_image(
    qemu_img: &Path,
    disk: &Path,
    format: &str,
    size: &str,
) -> Result<bool, LaunchError> {
    if disk.exists() {
        debug!("Disk image present: {}", disk.display());
        return Ok(false);
    }

    if let Some(parent) = disk.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| LaunchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    info!(
        "Creating {} disk image {} ({})",
        format,
        disk.display(),
        size
    );
    let output = Command::new(qemu_img)
        .arg("create")
        .arg("-f")
        .arg(format)
        .arg(disk)
        .arg(size)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| LaunchError::Spawn {
            program: qemu_img.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(LaunchError::DiskCreation {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(true)
}
