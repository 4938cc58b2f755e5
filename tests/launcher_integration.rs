//! Launcher tests against stand-in `qemu-img` and `qemu-system-x86_64`
//! shell scripts placed next to the settings file.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use qcalc::launcher::{Launcher, VmLauncher, VmSettings, settings, spawn_vm};

// ============================================================================
// Helper Functions
// ============================================================================

const FAKE_QEMU_IMG: &str = r#"#!/bin/sh
# qemu-img create -f <format> <path> <size>
echo "$@" > "$(dirname "$0")/qemu-img.args"
printf 'image' > "$4"
"#;

const FAKE_QEMU: &str = r#"#!/bin/sh
echo "booting with $*"
echo "no kvm here" >&2
exit 3
"#;

const GARBLED_QEMU: &str = r#"#!/bin/sh
printf 'first\n\377\376\nafter bad line\n'
printf 'stderr \377 too\n' >&2
"#;

const FAILING_QEMU_IMG: &str = r#"#!/bin/sh
echo "disk full" >&2
exit 1
"#;

fn vm_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qcalc-launcher-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn install_fakes(dir: &Path) {
    write_script(dir, "qemu-img", FAKE_QEMU_IMG);
    write_script(dir, "qemu-system-x86_64", FAKE_QEMU);
}

// ============================================================================
// spawn_vm
// ============================================================================

#[tokio::test]
async fn test_creates_missing_disk_and_captures_output() {
    let dir = vm_dir();
    install_fakes(&dir);
    let vm_settings = VmSettings {
        name: Some("scratch".to_string()),
        memory_mb: 512,
        ..VmSettings::default()
    };

    let running = spawn_vm(&vm_settings, &dir).await.unwrap();
    let status = running.finished.await.unwrap().expect("exit status");
    assert_eq!(status.code(), Some(3));

    let img_args = fs::read_to_string(dir.join("qemu-img.args")).unwrap();
    assert_eq!(
        img_args.trim(),
        format!("create -f qcow2 {} 20G", dir.join("disk.qcow2").display())
    );
    assert!(dir.join("disk.qcow2").exists());

    assert_eq!(running.log_path, dir.join("qemu.log"));
    let log = fs::read_to_string(&running.log_path).unwrap();
    assert!(log.contains(&format!("launch {}", running.launch_id)));
    assert!(log.contains("-name scratch -m 512 -smp 2"));
    assert!(log.contains("[stdout] booting with -name scratch"));
    assert!(log.contains("[stderr] no kvm here"));
    assert!(log.contains("=== exited:"));

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_invalid_utf8_output_does_not_stop_capture() {
    let dir = vm_dir();
    write_script(&dir, "qemu-img", FAKE_QEMU_IMG);
    write_script(&dir, "qemu-system-x86_64", GARBLED_QEMU);

    let running = spawn_vm(&VmSettings::default(), &dir).await.unwrap();
    running.finished.await.unwrap();

    let log = fs::read_to_string(&running.log_path).unwrap();
    assert!(log.contains("[stdout] first"));
    assert!(log.contains("[stdout] \u{FFFD}\u{FFFD}"));
    assert!(log.contains("[stdout] after bad line"));
    assert!(log.contains("[stderr] stderr \u{FFFD} too"));

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_existing_disk_is_not_recreated() {
    let dir = vm_dir();
    install_fakes(&dir);
    fs::write(dir.join("disk.qcow2"), "existing").unwrap();

    let running = spawn_vm(&VmSettings::default(), &dir).await.unwrap();
    running.finished.await.unwrap();

    assert!(!dir.join("qemu-img.args").exists());
    assert_eq!(fs::read_to_string(dir.join("disk.qcow2")).unwrap(), "existing");

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_disk_creation_failure_is_reported() {
    let dir = vm_dir();
    write_script(&dir, "qemu-img", FAILING_QEMU_IMG);
    write_script(&dir, "qemu-system-x86_64", FAKE_QEMU);

    let err = match spawn_vm(&VmSettings::default(), &dir).await {
        Ok(_) => panic!("disk creation should fail"),
        Err(e) => e,
    };
    let message = err.to_string();
    assert!(message.contains("disk full"), "unexpected error: {message}");
    assert!(!dir.join("qemu.log").exists());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_log_is_appended_across_launches() {
    let dir = vm_dir();
    install_fakes(&dir);

    let first = spawn_vm(&VmSettings::default(), &dir).await.unwrap();
    first.finished.await.unwrap();
    let second = spawn_vm(&VmSettings::default(), &dir).await.unwrap();
    second.finished.await.unwrap();

    let log = fs::read_to_string(dir.join("qemu.log")).unwrap();
    assert!(log.contains(&first.launch_id.to_string()));
    assert!(log.contains(&second.launch_id.to_string()));
    assert_eq!(log.matches("=== exited:").count(), 2);

    fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Launcher
// ============================================================================

#[tokio::test]
async fn test_launcher_launches_only_once() {
    let dir = vm_dir();
    install_fakes(&dir);
    let settings_path = dir.join("vm.json");
    settings::save(&settings_path, &VmSettings::default()).unwrap();

    let launcher = Launcher::new(settings_path);
    let first = launcher.launch().await;
    assert!(first.success, "first launch failed: {:?}", first.error);
    assert!(dir.join("disk.qcow2").exists());

    let second = launcher.launch().await;
    assert!(!second.success);
    assert!(second.error.unwrap().contains("already been launched"));
    assert!(launcher.has_attempted());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_launcher_reports_spawn_failure() {
    let dir = vm_dir();
    let settings_path = dir.join("vm.json");
    let vm_settings = VmSettings {
        qemu_path: dir.join("missing-qemu").display().to_string(),
        ..VmSettings::default()
    };
    settings::save(&settings_path, &vm_settings).unwrap();
    fs::write(dir.join("disk.qcow2"), "existing").unwrap();

    let outcome = Launcher::new(settings_path).launch().await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("missing-qemu"));

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_launcher_reports_malformed_settings() {
    let dir = vm_dir();
    install_fakes(&dir);
    let settings_path = dir.join("vm.json");
    fs::write(&settings_path, "{ \"memory_mb\": ").unwrap();

    let outcome = Launcher::new(settings_path).launch().await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("settings parse error"));
    assert!(!dir.join("disk.qcow2").exists());

    fs::remove_dir_all(&dir).ok();
}
