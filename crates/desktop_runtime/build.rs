use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const KNOWN_ANCHORS: [&str; 9] = [
    "cascade",
    "top-left",
    "top-right",
    "bottom-left",
    "bottom-right",
    "center",
    "center-left",
    "center-right",
    "left-of",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlacementManifest {
    anchor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgramManifest {
    id: String,
    title: String,
    icon: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placement: Option<PlacementManifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    can_minimize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    can_maximize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dynamic_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_bar: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    status_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    persists_across_close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shows_loading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desktop_icon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_menu: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinkManifest {
    label: String,
    url: String,
    icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgramCatalogManifest {
    schema_version: u32,
    programs: Vec<ProgramManifest>,
    #[serde(default)]
    links: Vec<LinkManifest>,
}

fn validate(catalog: &ProgramCatalogManifest, path: &str) {
    if catalog.schema_version != 1 {
        panic!(
            "program catalog schema mismatch in {path}: expected 1 found {}",
            catalog.schema_version
        );
    }

    let mut ids = BTreeSet::new();
    for program in &catalog.programs {
        if !ids.insert(program.id.as_str()) {
            panic!("duplicate program `{}` in {path}", program.id);
        }
        if program.width.is_some_and(|w| w <= 0) || program.height.is_some_and(|h| h <= 0) {
            panic!("program `{}` in {path} has a non-positive size", program.id);
        }
    }

    for program in &catalog.programs {
        let Some(placement) = &program.placement else {
            continue;
        };
        if !KNOWN_ANCHORS.contains(&placement.anchor.as_str()) {
            panic!(
                "program `{}` in {path} uses unknown anchor `{}`",
                program.id, placement.anchor
            );
        }
        if placement.anchor == "left-of" {
            match placement.target.as_deref() {
                Some(target) if ids.contains(target) && target != program.id => {}
                other => panic!(
                    "program `{}` in {path} anchors to missing program {other:?}",
                    program.id
                ),
            }
        }
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("programs.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: ProgramCatalogManifest = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    validate(&catalog, &path.display().to_string());

    let json = serde_json::to_string_pretty(&catalog).expect("serialize program catalog");
    let generated = format!(
        "/// Build-time generated program catalog JSON.\n\
pub const PROGRAM_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("program_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
