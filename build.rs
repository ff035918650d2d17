use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOCALE: &str = "es";

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set"));
    let locales_dir = manifest_dir.join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut locales = Vec::new();
    for entry in fs::read_dir(&locales_dir).expect("locales directory must be readable") {
        let path = entry.expect("locale entry must be readable").path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        println!("cargo:rerun-if-changed={}", path.display());
        let Some(tag) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        locales.push((tag.to_string(), load_locale(&path)));
    }
    locales.sort_by(|a, b| a.0.cmp(&b.0));

    assert!(
        locales.iter().any(|(tag, _)| tag == DEFAULT_LOCALE),
        "default locale `{DEFAULT_LOCALE}` has no catalog in locales/"
    );

    let mut out = String::new();
    writeln!(out, "pub const DEFAULT_LOCALE: &str = {DEFAULT_LOCALE:?};").unwrap();
    writeln!(out, "pub const LOCALES: &[(&str, &[(&str, &str)])] = &[").unwrap();
    for (tag, entries) in &locales {
        writeln!(out, "    ({tag:?}, &[").unwrap();
        for (key, value) in entries {
            writeln!(out, "        ({key:?}, {value:?}),").unwrap();
        }
        writeln!(out, "    ]),").unwrap();
    }
    writeln!(out, "];").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR must be set"));
    fs::write(out_dir.join("folio_i18n_generated.rs"), out)
        .expect("generated i18n catalog must be writable");
}

fn load_locale(path: &Path) -> Vec<(String, String)> {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()));
    let table = source
        .parse::<toml::Table>()
        .unwrap_or_else(|error| panic!("failed to parse {}: {error}", path.display()));
    let mut entries = Vec::new();
    flatten("", &table, &mut entries);
    entries.sort();
    entries
}

fn flatten(prefix: &str, table: &toml::Table, entries: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(text) => entries.push((full_key, text.clone())),
            toml::Value::Table(nested) => flatten(&full_key, nested, entries),
            other => panic!("locale key `{full_key}` must be a string, found {other}"),
        }
    }
}
