//! Integration tests for discovery and dispatch
//!
//! Tests cover:
//! - One pending target per discovered file, skipped or not
//! - Whole-module invocation ahead of the per-file fan-out
//! - Idempotent reruns (existing stubs are never regenerated)

use super::test_utils::{write_file, Workspace};
use pystubgen::dispatch::Scheduler;
use pystubgen::options::Options;
use pystubgen::resolver::ModuleResolver;
use pystubgen::Stubgen;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::test]
async fn test_one_pending_target_per_discovered_file() {
    let ws = Workspace::new();
    ws.package("pkg", &["a", "b"]).source("pkg/sub/__init__.py").source("pkg/b.pyi");
    // Stub for pkg.a already present: the unit skips but still enqueues its target.
    write_file(&ws.out().join("pkg").join("a.pyi"), "");

    let integration = Arc::new(ws.integration());
    let runner = Arc::new(ws.runner());
    let options = Options::new().normalize(&integration).unwrap();
    let resolution = ws.resolver().resolve("pkg").await.unwrap();

    let scheduler = Scheduler::new(Arc::clone(&integration), runner.clone(), options);
    let dispatched = scheduler.dispatch(&resolution).await.unwrap();

    assert_eq!(dispatched.summary.discovered, 5);
    assert_eq!(dispatched.targets.len(), 5);

    let sources: HashSet<PathBuf> = dispatched.targets.iter().map(|t| t.source.clone()).collect();
    assert_eq!(sources.len(), 5);

    let paths: HashSet<PathBuf> = dispatched.targets.iter().map(|t| t.path.clone()).collect();
    let out = ws.out().join("pkg");
    assert!(paths.contains(&out.join("__init__")));
    assert!(paths.contains(&out.join("a")));
    assert!(paths.contains(&out.join("b")));
    assert!(paths.contains(&out.join("sub").join("__init__")));

    // pkg/__init__ and pkg.a skip; pkg.b from .py and .pyi may both run.
    let invocations = runner.invocations();
    assert_eq!(invocations[0], "pkg");
    assert!(!invocations.contains(&"pkg.a".to_string()));
    assert!(!invocations.contains(&"pkg.__init__".to_string()));
    assert!(invocations.contains(&"pkg.sub.__init__".to_string()));
    assert!(dispatched.summary.skipped >= 2);
    assert_eq!(
        dispatched.summary.invoked + dispatched.summary.skipped,
        dispatched.summary.discovered + 1
    );
}

#[tokio::test]
async fn test_whole_module_runs_before_fan_out() {
    let ws = Workspace::new();
    ws.package("pkg", &["a", "b", "c"]);

    let runner = Arc::new(ws.runner());
    let engine = Stubgen::new(ws.integration(), ws.resolver(), runner.clone());
    engine.run("pkg", Options::new().concurrency(4usize)).await.unwrap();

    let invocations = runner.invocations();
    assert_eq!(invocations.first().map(String::as_str), Some("pkg"));
    let rest: HashSet<_> = invocations[1..].iter().cloned().collect();
    let expected: HashSet<_> = ["pkg.a", "pkg.b", "pkg.c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(rest, expected);
}

#[tokio::test]
async fn test_second_run_skips_existing_stubs() {
    let ws = Workspace::new();
    ws.package("pkg", &["a", "b"]).source("pkg/sub/__init__.py").source("pkg/sub/c.py");

    let runner = Arc::new(ws.runner());
    let engine = Stubgen::new(ws.integration(), ws.resolver(), runner.clone());

    let first = engine.run("pkg", Options::new()).await.unwrap();
    assert_eq!(first.summary.discovered, 5);
    let first_per_file: Vec<_> = runner.invocations().into_iter().skip(1).collect();
    assert_eq!(first_per_file.len(), 4);

    runner.reset();
    let second = engine.run("pkg", Options::new()).await.unwrap();

    // Only the whole-module invocation repeats; every file's stub already exists.
    assert_eq!(runner.invocations(), vec!["pkg".to_string()]);
    assert_eq!(second.summary.skipped, 5);
    assert_eq!(second.summary.invoked, 1);
}

#[tokio::test]
async fn test_single_file_module_has_no_fan_out() {
    let ws = Workspace::new();
    ws.source("mod_x.py");

    let runner = Arc::new(ws.runner());
    let engine = Stubgen::new(ws.integration(), ws.resolver(), runner.clone());
    let report = engine.run("mod_x", Options::new()).await.unwrap();

    assert_eq!(runner.invocations(), vec!["mod_x".to_string()]);
    assert_eq!(report.summary.discovered, 0);
    assert!(ws.out().join("mod_x.pyi").is_file());
}
