//! Properties of module naming, expected output paths and discovery order

use proptest::prelude::*;
use pystubgen::dispatch::{discover, expected_target, module_path};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn segment() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}"
}

fn extension() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("py"), Just("pyi")]
}

proptest! {
    #[test]
    fn module_path_joins_segments_below_root(
        segments in prop::collection::vec(segment(), 1..5),
        ext in extension(),
    ) {
        let root = Path::new("/src/pkg");
        let mut path: PathBuf = root.join(segments.join("/"));
        path.set_extension(ext);

        let module = module_path(&path, root).unwrap();
        prop_assert_eq!(module, format!("pkg.{}", segments.join(".")));
    }

    #[test]
    fn expected_target_mirrors_source_layout(
        segments in prop::collection::vec(segment(), 1..5),
        ext in extension(),
    ) {
        let root = Path::new("/src/pkg");
        let out = Path::new("/work/out");
        let mut path: PathBuf = root.join(segments.join("/"));
        path.set_extension(ext);

        let target = expected_target(out, &path, root).unwrap();
        prop_assert_eq!(target.extension(), None);
        prop_assert!(target.starts_with(out.join("pkg")));
        let relative: Vec<String> = target
            .strip_prefix(out)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let mut expected = vec!["pkg".to_string()];
        expected.extend(segments);
        prop_assert_eq!(relative, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn discovery_lists_sources_before_stubs_each_sorted(
        files in prop::collection::btree_set(
            (prop::collection::vec(segment(), 1..4), extension()),
            1..12,
        ),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("pkg");
        std::fs::create_dir_all(&root).unwrap();

        let mut written = BTreeSet::new();
        for (segments, ext) in &files {
            let mut path = root.join(segments.join("/"));
            path.set_extension(ext);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "").unwrap();
            written.insert(path);
        }

        let discovered = discover(&root).unwrap();
        prop_assert_eq!(discovered.len(), written.len());

        let split = discovered
            .iter()
            .position(|p| p.extension().map_or(false, |e| e == "pyi"))
            .unwrap_or(discovered.len());
        let (sources, stubs) = discovered.split_at(split);
        prop_assert!(sources.iter().all(|p| p.extension().map_or(false, |e| e == "py")));
        prop_assert!(stubs.iter().all(|p| p.extension().map_or(false, |e| e == "pyi")));
        prop_assert!(sources.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(stubs.windows(2).all(|w| w[0] < w[1]));

        let found: BTreeSet<PathBuf> = discovered.into_iter().collect();
        prop_assert_eq!(found, written);
    }
}
