use anyhow::{Context, Result, bail};
use clab::{DEFAULT_PREFIX, Registry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEC_NAME: &str = "clab.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Argument specs in declaration order.
    #[serde(default)]
    pub args: Vec<ArgEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgEntry {
    pub id: String,
    /// No tags makes the entry a positional.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagEntry>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub consume: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub abort: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub over: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub initial_state: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// State written when the tag is matched.
    #[serde(default = "default_toggle")]
    pub toggle: bool,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_toggle() -> bool {
    true
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TagEntry {
    fn new(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            toggle: true,
        }
    }
}

impl SpecFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read spec file: {}", path.display()))?;
        let spec: SpecFile = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse spec JSON: {}", path.display()))?;

        if let Some(version) = spec.schema_version {
            if version != SCHEMA_VERSION {
                bail!(
                    "unsupported schemaVersion {version} in {} (expected {SCHEMA_VERSION})",
                    path.display()
                );
            }
        }
        Ok(spec)
    }

    /// Replay every entry through the builder so all build-time checks apply.
    pub fn build(&self) -> clab::Result<Registry<'static>> {
        let mut registry = Registry::new();
        for entry in &self.args {
            let mut cfg = registry.start(entry.id.as_str());
            for tag in &entry.tags {
                cfg = cfg.toggle_with_prefix(tag.toggle, tag.name.as_str(), tag.prefix.as_str());
            }
            cfg = if entry.allowed.is_empty() {
                cfg.consume(entry.consume)
            } else {
                cfg.consume_with(entry.consume, &entry.allowed)
            };
            if entry.required {
                cfg = cfg.required();
            }
            if entry.multiple {
                cfg = cfg.multiple();
            }
            if entry.over {
                cfg = cfg.over();
            }
            if entry.abort {
                cfg = cfg.abort();
            }
            cfg.initial(entry.initial_state)
                .initial(entry.initial_values.clone())
                .end()?;
        }
        Ok(registry)
    }

    /// Starter spec: a required input, an output defaulting to `a.out` and a
    /// help flag that aborts evaluation.
    pub fn starter() -> Self {
        Self {
            schema_version: Some(SCHEMA_VERSION),
            args: vec![
                ArgEntry {
                    id: "input".to_string(),
                    tags: vec![TagEntry::new("i", "-"), TagEntry::new("input", "--")],
                    consume: 1,
                    required: true,
                    ..Default::default()
                },
                ArgEntry {
                    id: "output".to_string(),
                    tags: vec![TagEntry::new("o", "-"), TagEntry::new("output", "--")],
                    consume: 1,
                    initial_values: vec!["a.out".to_string()],
                    ..Default::default()
                },
                ArgEntry {
                    id: "help".to_string(),
                    tags: vec![TagEntry::new("h", "-"), TagEntry::new("help", "--")],
                    abort: true,
                    ..Default::default()
                },
            ],
        }
    }
}

pub fn write_starter_spec(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_SPEC_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{DEFAULT_SPEC_NAME} already exists in {} (use --force to overwrite)",
            project_dir.display()
        );
    }

    let mut out = serde_json::to_string_pretty(&SpecFile::starter())
        .context("failed to serialize spec file")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clab::{BuildFault, Error};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("clab-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn spec_file_deserializes_camel_case_with_defaults() {
        let json = r#"{
  "schemaVersion": 1,
  "args": [
    {
      "id": "color",
      "tags": [
        { "name": "color", "prefix": "--" },
        { "name": "no-color", "prefix": "--", "toggle": false }
      ],
      "initialState": true
    },
    { "id": "level", "tags": [{ "name": "l" }], "consume": 1, "allowed": ["1", "2"] },
    { "id": "files", "multiple": true, "initialValues": ["-"] }
  ]
}"#;
        let spec: SpecFile = serde_json::from_str(json).unwrap();
        assert_eq!(spec.schema_version, Some(1));
        assert_eq!(spec.args.len(), 3);
        assert!(!spec.args[0].tags[1].toggle);
        assert!(spec.args[0].initial_state);
        assert_eq!(spec.args[1].tags[0].prefix, "-");
        assert!(spec.args[1].tags[0].toggle);

        let registry = spec.build().unwrap();
        let eval = registry.evaluate(["--no-color", "-l", "2", "x", "y"]).unwrap();
        assert!(!eval.state("color"));
        assert_eq!(eval.value("level"), Some("2"));
        assert_eq!(eval.list("files"), ["x", "y"]);
    }

    #[test]
    fn build_surfaces_invalid_building() {
        let spec = SpecFile {
            schema_version: None,
            args: vec![ArgEntry {
                id: "files".to_string(),
                consume: 2,
                multiple: true,
                ..Default::default()
            }],
        };
        let err = spec.build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBuilding {
                id: "files".into(),
                fault: BuildFault::GreedyWithArity
            }
        );
    }

    #[test]
    fn starter_round_trips_through_disk() {
        let dir = make_temp_dir("starter");
        let dest = write_starter_spec(&dir, false).unwrap();
        let spec = SpecFile::from_file(&dest).unwrap();
        assert_eq!(spec, SpecFile::starter());

        let registry = spec.build().unwrap();
        let ids: Vec<&str> = registry.specs().iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["input", "output", "help"]);

        assert!(write_starter_spec(&dir, false).is_err());
        assert!(write_starter_spec(&dir, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unsupported_schema_version_is_rejected() {
        let dir = make_temp_dir("schema");
        let path = dir.join(DEFAULT_SPEC_NAME);
        fs::write(&path, r#"{ "schemaVersion": 7, "args": [] }"#).unwrap();
        let err = SpecFile::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported schemaVersion 7"));
        let _ = fs::remove_dir_all(&dir);
    }
}
