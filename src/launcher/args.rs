//! QEMU command-line assembly.

use std::path::Path;

use crate::launcher::settings::VmSettings;

/// Build the argument list for `qemu-system-*` from resolved paths.
pub fn build_qemu_args(settings: &VmSettings, disk: &Path, iso: Option<&Path>) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(name) = &settings.name {
        args.extend(["-name".to_string(), name.clone()]);
    }

    args.extend([
        "-m".to_string(),
        settings.memory_mb.to_string(),
        "-smp".to_string(),
        settings.cpu_cores.to_string(),
        "-drive".to_string(),
        format!("file={},format={}", disk.display(), settings.disk_format),
    ]);

    if let Some(iso) = iso {
        args.extend([
            "-cdrom".to_string(),
            iso.display().to_string(),
            "-boot".to_string(),
            "order=dc".to_string(),
        ]);
    }

    if let Some(accel) = &settings.accelerator {
        args.extend(["-accel".to_string(), accel.clone()]);
    }

    if let Some(display) = &settings.display {
        args.extend(["-display".to_string(), display.clone()]);
    }

    args.extend(settings.extra_args.iter().cloned());
    args
}
