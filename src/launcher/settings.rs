//! # VM Settings
//!
//! The JSON record the launcher reads before every launch and the settings
//! editor writes back. Every field has a default, so a sparse or missing
//! file still yields a bootable configuration.

use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub qemu_path: String,
    pub qemu_img_path: String,
    pub disk_image: String,
    pub disk_format: String,
    pub disk_size: String,
    pub memory_mb: u32,
    pub cpu_cores: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub extra_args: Vec<String>,
    pub log_file: String,
}

impl Default for VmSettings {
    fn default() -> Self {
        Self {
            name: None,
            qemu_path: "qemu-system-x86_64".to_string(),
            qemu_img_path: "qemu-img".to_string(),
            disk_image: "disk.qcow2".to_string(),
            disk_format: "qcow2".to_string(),
            disk_size: "20G".to_string(),
            memory_mb: 2048,
            cpu_cores: 2,
            iso_path: None,
            accelerator: None,
            display: None,
            extra_args: Vec::new(),
            log_file: "qemu.log".to_string(),
        }
    }
}

/// Load settings from `path`.
///
/// A missing file is created with defaults so users have something to edit.
pub fn load(path: &Path) -> Result<VmSettings, SettingsError> {
    if !path.exists() {
        info!("No VM settings at {}, writing defaults", path.display());
        let defaults = VmSettings::default();
        if let Err(e) = save(path, &defaults) {
            warn!("Failed to write default VM settings: {}", e);
        }
        return Ok(defaults);
    }

    let json = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&json)?;
    info!("Loaded VM settings from {}", path.display());
    Ok(settings)
}

/// Atomically write settings as pretty JSON (via `.tmp` + rename).
pub fn save(path: &Path, settings: &VmSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// A user-editable field of [`VmSettings`], in editor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    QemuPath,
    QemuImgPath,
    DiskImage,
    DiskFormat,
    DiskSize,
    MemoryMb,
    CpuCores,
    IsoPath,
    Accelerator,
    Display,
    ExtraArgs,
    LogFile,
}

impl SettingsField {
    pub const ALL: [SettingsField; 13] = [
        SettingsField::Name,
        SettingsField::QemuPath,
        SettingsField::QemuImgPath,
        SettingsField::DiskImage,
        SettingsField::DiskFormat,
        SettingsField::DiskSize,
        SettingsField::MemoryMb,
        SettingsField::CpuCores,
        SettingsField::IsoPath,
        SettingsField::Accelerator,
        SettingsField::Display,
        SettingsField::ExtraArgs,
        SettingsField::LogFile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Name => "VM name",
            SettingsField::QemuPath => "QEMU binary",
            SettingsField::QemuImgPath => "qemu-img binary",
            SettingsField::DiskImage => "Disk image",
            SettingsField::DiskFormat => "Disk format",
            SettingsField::DiskSize => "Disk size",
            SettingsField::MemoryMb => "Memory (MB)",
            SettingsField::CpuCores => "CPU cores",
            SettingsField::IsoPath => "Boot ISO",
            SettingsField::Accelerator => "Accelerator",
            SettingsField::Display => "Display",
            SettingsField::ExtraArgs => "Extra arguments",
            SettingsField::LogFile => "Log file",
        }
    }

    pub fn get(self, settings: &VmSettings) -> String {
        match self {
            SettingsField::Name => settings.name.clone().unwrap_or_default(),
            SettingsField::QemuPath => settings.qemu_path.clone(),
            SettingsField::QemuImgPath => settings.qemu_img_path.clone(),
            SettingsField::DiskImage => settings.disk_image.clone(),
            SettingsField::DiskFormat => settings.disk_format.clone(),
            SettingsField::DiskSize => settings.disk_size.clone(),
            SettingsField::MemoryMb => settings.memory_mb.to_string(),
            SettingsField::CpuCores => settings.cpu_cores.to_string(),
            SettingsField::IsoPath => settings.iso_path.clone().unwrap_or_default(),
            SettingsField::Accelerator => settings.accelerator.clone().unwrap_or_default(),
            SettingsField::Display => settings.display.clone().unwrap_or_default(),
            SettingsField::ExtraArgs => join_args(&settings.extra_args),
            SettingsField::LogFile => settings.log_file.clone(),
        }
    }

    /// Parse `raw` into the field. Empty input clears optional fields;
    /// required text fields and numbers reject it.
    pub fn set(self, settings: &mut VmSettings, raw: &str) -> Result<(), SettingsError> {
        let value = raw.trim();
        match self {
            SettingsField::Name => settings.name = optional(value),
            SettingsField::QemuPath => settings.qemu_path = self.required(value)?,
            SettingsField::QemuImgPath => settings.qemu_img_path = self.required(value)?,
            SettingsField::DiskImage => settings.disk_image = self.required(value)?,
            SettingsField::DiskFormat => settings.disk_format = self.required(value)?,
            SettingsField::DiskSize => settings.disk_size = self.required(value)?,
            SettingsField::MemoryMb => settings.memory_mb = self.positive(value)?,
            SettingsField::CpuCores => settings.cpu_cores = self.positive(value)?,
            SettingsField::IsoPath => settings.iso_path = optional(value),
            SettingsField::Accelerator => settings.accelerator = optional(value),
            SettingsField::Display => settings.display = optional(value),
            SettingsField::ExtraArgs => settings.extra_args = self.split(value)?,
            SettingsField::LogFile => settings.log_file = self.required(value)?,
        }
        Ok(())
    }

    fn required(self, value: &str) -> Result<String, SettingsError> {
        if value.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: self.label(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(value.to_string())
    }

    fn positive(self, value: &str) -> Result<u32, SettingsError> {
        match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(SettingsError::InvalidValue {
                field: self.label(),
                message: format!("expected a positive whole number, got '{value}'"),
            }),
        }
    }
}

impl SettingsField {
    /// Split editor text into arguments. Double or single quotes group
    /// words and a backslash escapes the next character.
    fn split(self, value: &str) -> Result<Vec<String>, SettingsError> {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut in_arg = false;
        let mut quote: Option<char> = None;
        let mut chars = value.chars();

        while let Some(c) = chars.next() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some('\''), c) => current.push(c),
                (_, '\\') => {
                    in_arg = true;
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                (Some(_), c) => current.push(c),
                (None, '"' | '\'') => {
                    in_arg = true;
                    quote = Some(c);
                }
                (None, c) if c.is_whitespace() => {
                    if in_arg {
                        args.push(std::mem::take(&mut current));
                        in_arg = false;
                    }
                }
                (None, c) => {
                    in_arg = true;
                    current.push(c);
                }
            }
        }

        if quote.is_some() {
            return Err(SettingsError::InvalidValue {
                field: self.label(),
                message: "unterminated quote".to_string(),
            });
        }
        if in_arg {
            args.push(current);
        }
        Ok(args)
    }
}

/// Inverse of `SettingsField::split`: quote arguments that would not
/// survive a whitespace split.
fn join_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && !arg
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
            if plain {
                arg.clone()
            } else {
                let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{escaped}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
