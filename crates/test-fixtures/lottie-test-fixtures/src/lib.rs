use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static INDEX: Lazy<Index> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/index.json");
    serde_json::from_str(raw).expect("fixtures index should parse")
});

#[derive(Debug, Deserialize)]
struct Index {
    manifests: HashMap<String, String>,
    configs: HashMap<String, String>,
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

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Container manifests.
pub mod manifests {
    use super::*;

    pub fn keys() -> Vec<String> {
        INDEX.manifests.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&INDEX.manifests, "manifest", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        load_json(lookup(&INDEX.manifests, "manifest", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&INDEX.manifests, "manifest", name)?))
    }
}

/// Engine configuration documents.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        INDEX.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&INDEX.configs, "config", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        load_json(lookup(&INDEX.configs, "config", name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_indexed_fixture_is_readable_json() {
        for name in manifests::keys() {
            let value: serde_json::Value = manifests::load(&name).unwrap();
            assert!(value.get("animations").is_some(), "{name} lacks animations");
        }
        for name in configs::keys() {
            let _: serde_json::Value = configs::load(&name).unwrap();
        }
    }

    #[test]
    fn unknown_fixture_names_error() {
        let err = manifests::json("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }
}
