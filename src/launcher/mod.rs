//! # VM Launcher
//!
//! Boots the QEMU virtual machine described by the settings JSON.
//!
//! ```text
//! launch()
//!   ├── one-shot guard        // at most one attempt per process
//!   ├── settings::load()      // JSON → VmSettings
//!   ├── paths::resolve_*()    // relative to the settings file
//!   ├── disk::ensure_*()      // qemu-img create if the image is missing
//!   ├── args::build_*()       // VmSettings → argv
//!   └── spawn + log capture   // stdout/stderr → log file, in background tasks
//! ```
//!
//! `launch()` returns once QEMU is running. Output capture and the exit
//! status line keep going on tokio tasks after it returns.

pub mod args;
pub mod disk;
pub mod paths;
pub mod settings;

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use settings::{SettingsError, SettingsField, VmSettings};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("the virtual machine has already been launched")]
    AlreadyLaunched,
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("launch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("disk image creation failed ({status}): {stderr}")]
    DiskCreation { status: String, stderr: String },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of a launch attempt, as reported back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl LaunchOutcome {
    pub fn launched() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait VmLauncher: Send + Sync {
    /// Attempt to boot the VM. Implementations attempt at most once.
    async fn launch(&self) -> LaunchOutcome;
}

/// The real launcher: settings file on disk, QEMU as a child process.
pub struct Launcher {
    settings_path: PathBuf,
    attempted: Mutex<bool>,
}

impl Launcher {
    pub fn new(settings_path: PathBuf) -> Self {
        Self {
            settings_path,
            attempted: Mutex::new(false),
        }
    }

    pub fn has_attempted(&self) -> bool {
        *self.attempted.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flip the one-shot flag. Returns false if it was already taken.
    fn claim(&self) -> bool {
        let mut attempted = self.attempted.lock().unwrap_or_else(|e| e.into_inner());
        if *attempted {
            return false;
        }
        *attempted = true;
        true
    }

    async fn try_launch(&self) -> Result<RunningVm, LaunchError> {
        // settings::load is std::fs, keep it off the async workers
        let path = self.settings_path.clone();
        let settings = tokio::task::spawn_blocking(move || settings::load(&path)).await??;
        let base_dir = self
            .settings_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        spawn_vm(&settings, &base_dir).await
    }
}

#[async_trait]
impl VmLauncher for Launcher {
    async fn launch(&self) -> LaunchOutcome {
        if !self.claim() {
            warn!("Launch requested again, ignoring");
            return LaunchOutcome::failed(LaunchError::AlreadyLaunched.to_string());
        }

        match self.try_launch().await {
            Ok(vm) => {
                info!(
                    "VM launched (launch_id={}, pid={:?}, log={})",
                    vm.launch_id,
                    vm.pid,
                    vm.log_path.display()
                );
                LaunchOutcome::launched()
            }
            Err(e) => {
                error!("VM launch failed: {}", e);
                LaunchOutcome::failed(e.to_string())
            }
        }
    }
}

/// A spawned QEMU process. `finished` resolves once the process has exited
/// and all of its output is in the log file.
pub struct RunningVm {
    pub launch_id: Uuid,
    pub pid: Option<u32>,
    pub log_path: PathBuf,
    pub finished: JoinHandle<Option<ExitStatus>>,
}

/// Provision the disk, spawn QEMU and start capturing its output.
pub async fn spawn_vm(settings: &VmSettings, base_dir: &Path) -> Result<RunningVm, LaunchError> {
    let qemu = paths::resolve_program(&settings.qemu_path, base_dir);
    let qemu_img = paths::resolve_program(&settings.qemu_img_path, base_dir);
    let disk = paths::resolve_path(&settings.disk_image, base_dir);
    let iso = settings
        .iso_path
        .as_deref()
        .map(|p| paths::resolve_path(p, base_dir));
    let log_path = paths::resolve_path(&settings.log_file, base_dir);

    if disk::ensure_disk_image(&qemu_img, &disk, &settings.disk_format, &settings.disk_size).await? {
        info!("Created disk image {}", disk.display());
    }

    let args = args::build_qemu_args(settings, &disk, iso.as_deref());
    let launch_id = Uuid::new_v4();

    let mut log = open_log(&log_path).await?;
    let header = format!(
        "=== {} launch {} ===\n$ {} {}\n",
        Utc::now().to_rfc3339(),
        launch_id,
        qemu.display(),
        args.join(" ")
    );
    write_log(&mut log, &log_path, header.as_bytes()).await?;

    debug!("Spawning {} {:?}", qemu.display(), args);
    let mut command = Command::new(&qemu);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if !base_dir.as_os_str().is_empty() {
        command.current_dir(base_dir);
    }
    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: qemu.display().to_string(),
        source,
    })?;
    let pid = child.id();

    let log = Arc::new(tokio::sync::Mutex::new(log));
    let stdout_task = child
        .stdout
        .take()
        .map(|out| tokio::spawn(capture_lines(out, "stdout", log.clone())));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| tokio::spawn(capture_lines(err, "stderr", log.clone())));

    let finished = tokio::spawn(async move {
        let status = child.wait().await;
        for task in [stdout_task, stderr_task].into_iter().flatten() {
            let _ = task.await;
        }

        let line = match &status {
            Ok(status) => format!("=== exited: {} ===\n", status),
            Err(e) => format!("=== wait failed: {} ===\n", e),
        };
        let mut log = log.lock().await;
        if let Err(e) = log.write_all(line.as_bytes()).await {
            warn!("Failed to write exit status to VM log: {}", e);
        }
        let _ = log.flush().await;

        match status {
            Ok(status) => {
                info!("VM process exited: {}", status);
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for VM process: {}", e);
                None
            }
        }
    });

    Ok(RunningVm {
        launch_id,
        pid,
        log_path,
        finished,
    })
}

async fn open_log(path: &Path) -> Result<File, LaunchError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| LaunchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| LaunchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_log(log: &mut File, path: &Path, bytes: &[u8]) -> Result<(), LaunchError> {
    let result = match log.write_all(bytes).await {
        Ok(()) => log.flush().await,
        Err(e) => Err(e),
    };
    result.map_err(|source| LaunchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy lines from a child pipe into the shared log, tagged by stream.
///
/// Bytes that are not UTF-8 are replaced, never fatal. The pipe is drained
/// until EOF even if the log stops accepting writes, so the child never
/// blocks on a full pipe or dies of SIGPIPE.
async fn capture_lines<R>(reader: R, stream: &'static str, log: Arc<tokio::sync::Mutex<File>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut log_ok = true;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => return,
            Ok(_) => {
                if !log_ok {
                    continue;
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                let mut log = log.lock().await;
                if let Err(e) = log.write_all(format!("[{stream}] {line}\n").as_bytes()).await {
                    warn!("Failed to write VM {} to log: {}", stream, e);
                    log_ok = false;
                }
            }
            Err(e) => {
                warn!("Failed to read VM {}: {}", stream, e);
                return;
            }
        }
    }
}
