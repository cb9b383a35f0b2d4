use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    timelines: HashMap<String, String>,
    triggers: HashMap<String, String>,
    stages: HashMap<String, String>,
}

/// One element of a stage layout fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementFixture {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// `[top, height]` in document pixels.
    #[serde(default)]
    pub bounds: Option<[f32; 2]>,
}

/// Element tree for scroll and stagger tests.
#[derive(Debug, Clone, Deserialize)]
pub struct StageFixture {
    pub elements: Vec<ElementFixture>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod timelines {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.timelines.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.timelines, "timeline", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.timelines, "timeline", name)?;
        super::load_json(rel)
    }
}

pub mod triggers {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.triggers.keys().cloned().collect()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.triggers, "trigger", name)?;
        super::load_json(rel)
    }
}

pub mod stages {
    use super::*;

    pub fn load(name: &str) -> Result<StageFixture> {
        let rel = lookup(&MANIFEST.stages, "stage", name)?;
        super::load_json(rel)
    }
}
