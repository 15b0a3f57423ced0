//! Integration tests for relocation to a requested output directory
//!
//! Tests cover:
//! - Successful relocation replaces the previous output
//! - Failure while moving the new output restores the previous output
//! - Plain modules relocate their single stub file

use super::test_utils::{write_file, Workspace};
use pystubgen::options::Options;
use pystubgen::reconcile::{backup_path, FileMover, FsMover};
use pystubgen::{Stubgen, StubgenError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Moves like `FsMover`, except moving `fail_from` leaves a partial copy behind and fails
struct FailingMover {
    fail_from: PathBuf,
}

impl FileMover for FailingMover {
    fn move_path(&self, from: &Path, to: &Path) -> io::Result<()> {
        if from == self.fail_from {
            write_file(&to.join("partial.pyi"), "partial");
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        FsMover.move_path(from, to)
    }
}

#[tokio::test]
async fn test_relocation_replaces_previous_output() {
    let ws = Workspace::new();
    ws.package("pkg", &["a"]);
    let stubs = ws.path("stubs");
    write_file(&stubs.join("pkg").join("old.pyi"), "old");

    let runner = Arc::new(ws.runner());
    let engine = Stubgen::new(ws.integration(), ws.resolver(), runner);
    let report = engine
        .run("pkg", Options::new().out_dir(&stubs))
        .await
        .unwrap();

    let target = stubs.join("pkg");
    assert_eq!(report.relocated_to.as_deref(), Some(target.as_path()));
    assert!(target.join("__init__.pyi").is_file());
    assert!(target.join("a.pyi").is_file());
    assert!(!target.join("old.pyi").exists());
    assert!(!backup_path(&target).exists());
    assert!(!ws.out().join("pkg").exists());
}

#[tokio::test]
async fn test_failed_relocation_restores_previous_output() {
    let ws = Workspace::new();
    ws.package("pkg", &["a"]);
    let stubs = ws.path("stubs");
    write_file(&stubs.join("pkg").join("old.pyi"), "old");

    let mover = Arc::new(FailingMover {
        fail_from: ws.out().join("pkg"),
    });
    let engine = Stubgen::new(ws.integration(), ws.resolver(), Arc::new(ws.runner()))
        .with_mover(mover);
    let err = engine
        .run("pkg", Options::new().out_dir(&stubs))
        .await
        .unwrap_err();

    match err {
        StubgenError::RelocationFailed { origin, target, .. } => {
            assert_eq!(origin, ws.out().join("pkg"));
            assert_eq!(target, stubs.join("pkg"));
        }
        other => panic!("expected RelocationFailed, got {:?}", other),
    }

    let target = stubs.join("pkg");
    assert_eq!(std::fs::read_to_string(target.join("old.pyi")).unwrap(), "old");
    assert!(!target.join("partial.pyi").exists());
    assert!(!backup_path(&target).exists());
    // The generated output stays where the tool wrote it.
    assert!(ws.out().join("pkg").join("a.pyi").is_file());
}

#[tokio::test]
async fn test_failed_relocation_without_previous_output_leaves_nothing() {
    let ws = Workspace::new();
    ws.package("pkg", &["a"]);
    let stubs = ws.path("stubs");

    let mover = Arc::new(FailingMover {
        fail_from: ws.out().join("pkg"),
    });
    let engine = Stubgen::new(ws.integration(), ws.resolver(), Arc::new(ws.runner()))
        .with_mover(mover);
    let result = engine.run("pkg", Options::new().out_dir(&stubs)).await;

    assert!(matches!(result, Err(StubgenError::RelocationFailed { .. })));
    assert!(!stubs.join("pkg").exists());
}

#[tokio::test]
async fn test_single_file_module_relocates_stub() {
    let ws = Workspace::new();
    ws.source("solo.py");
    let stubs = ws.path("stubs");

    let engine = Stubgen::new(ws.integration(), ws.resolver(), Arc::new(ws.runner()));
    let report = engine
        .run("solo", Options::new().out_dir(&stubs))
        .await
        .unwrap();

    assert_eq!(report.relocated_to, Some(stubs.join("solo.pyi")));
    assert!(stubs.join("solo.pyi").is_file());
    assert!(!ws.out().join("solo.pyi").exists());
}

#[tokio::test]
async fn test_default_out_dir_skips_relocation() {
    let ws = Workspace::new();
    ws.package("pkg", &["a"]);

    let engine = Stubgen::new(ws.integration(), ws.resolver(), Arc::new(ws.runner()));
    let report = engine
        .run("pkg", Options::new().out_dir(ws.out()))
        .await
        .unwrap();

    assert!(report.relocated_to.is_none());
    assert!(ws.out().join("pkg").join("a.pyi").is_file());
}

#[tokio::test]
async fn test_default_out_dir_spelled_differently_skips_relocation() {
    let ws = Workspace::new();
    ws.package("pkg", &["a"]);
    let same_out = ws.path("src/../out");
    assert_ne!(same_out, ws.out());

    let engine = Stubgen::new(ws.integration(), ws.resolver(), Arc::new(ws.runner()));
    let report = engine
        .run("pkg", Options::new().out_dir(&same_out))
        .await
        .unwrap();

    assert!(report.relocated_to.is_none());
    assert!(ws.out().join("pkg").join("a.pyi").is_file());
    assert!(!backup_path(&ws.out().join("pkg")).exists());
}
