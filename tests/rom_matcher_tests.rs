//! Integration tests for core discovery and ROM matching
//!
//! These tests verify:
//! - ROM scans return exactly the files with a supported extension
//! - Extension matching ignores case
//! - A cores directory with no plugins yields no cores and an empty scan

use arcadenne::ffi::SystemInfo;
use arcadenne::services::{find_supported_roms, load_cores, scan_roms, supported_extensions};
use arcadenne::CoreInfo;
use camino::Utf8PathBuf;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const EXTENSIONS: [&str; 6] = ["nes", "sfc", "smc", "gb", "md", "zip"];

fn create_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, path)
}

fn core(path: &str, extensions: &str) -> CoreInfo {
    CoreInfo::from_system_info(
        path,
        SystemInfo {
            library_name: path.to_string(),
            library_version: "1.0".to_string(),
            valid_extensions: extensions.to_string(),
            need_fullpath: false,
            block_extract: false,
        },
    )
}

/// Randomly upper-case some characters of an extension
fn mixed_case(ext: &str, mask: u8) -> String {
    ext.chars()
        .enumerate()
        .map(|(i, c)| if mask & (1 << (i % 8)) != 0 { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_scan_returns_exactly_supported_files(
        files in prop::collection::btree_map(0usize..40, (0usize..EXTENSIONS.len(), any::<u8>()), 0..12),
        supported in prop::collection::btree_set(0usize..EXTENSIONS.len(), 1..EXTENSIONS.len()),
    ) {
        let (_temp, dir) = create_dir();

        let mut expected = BTreeSet::new();
        for (stem, (ext_index, mask)) in &files {
            let file_name = format!("game{}.{}", stem, mixed_case(EXTENSIONS[*ext_index], *mask));
            fs::write(dir.join(&file_name), b"rom").unwrap();
            if supported.contains(ext_index) {
                expected.insert(dir.join(&file_name));
            }
        }

        let extensions: BTreeSet<String> =
            supported.iter().map(|i| EXTENSIONS[*i].to_string()).collect();
        let roms = find_supported_roms(&dir, &extensions).unwrap();

        let found: BTreeSet<Utf8PathBuf> = roms.into_iter().map(|rom| rom.path).collect();
        prop_assert_eq!(found, expected);
    }
}

#[test]
fn test_union_of_core_extensions() {
    let cores = vec![
        core("/cores/a_libretro.so", "nes|fds"),
        core("/cores/b_libretro.so", "sfc|SMC"),
        core("/cores/c_libretro.so", "nes"),
    ];
    let extensions = supported_extensions(&cores);
    let expected: BTreeSet<String> = ["fds", "nes", "sfc", "smc"].iter().map(|s| s.to_string()).collect();
    assert_eq!(extensions, expected);
}

#[test]
fn test_scan_against_cores() {
    let (_temp, dir) = create_dir();
    for name in ["Contra.nes", "Metroid.SFC", "notes.txt", "Sonic.md"] {
        fs::write(dir.join(name), b"rom").unwrap();
    }

    let cores = vec![core("/cores/a_libretro.so", "nes"), core("/cores/b_libretro.so", "sfc")];
    let roms = scan_roms(&dir, &cores).unwrap();

    let names: Vec<_> = roms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Contra", "Metroid"]);
}

#[test]
fn test_no_plugins_gives_no_cores_and_no_roms() {
    let (_cores_temp, cores_dir) = create_dir();
    fs::write(cores_dir.join("snes9x_libretro.info"), b"display_name = \"Snes9x\"").unwrap();
    fs::create_dir(cores_dir.join("subdir.so")).unwrap();

    let cores = load_cores(&cores_dir, &arcadenne::ffi::DynamicLibraryReader).unwrap();
    assert!(cores.is_empty());

    let (_roms_temp, roms_dir) = create_dir();
    fs::write(roms_dir.join("Contra.nes"), b"rom").unwrap();

    let roms = scan_roms(&roms_dir, &cores).unwrap();
    assert!(roms.is_empty());
}
