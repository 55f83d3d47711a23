// src/preset.rs

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

use crate::invert::ColumnSpec;

/// A named pair of column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub key: String,
    pub value: String,
}

impl Preset {
    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.key.clone(), self.value.clone())
    }
}

/// The known presets plus which one applies when nothing is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetBook {
    pub default: String,
    pub presets: Vec<Preset>,
}

impl Default for PresetBook {
    fn default() -> Self {
        Self {
            default: "ml".into(),
            presets: vec![
                Preset {
                    name: "ml".into(),
                    key: "MLアドレス".into(),
                    value: "MLメンバー".into(),
                },
                Preset {
                    name: "ml-en".into(),
                    key: "ML Address".into(),
                    value: "ML Members".into(),
                },
            ],
        }
    }
}

impl PresetBook {
    /// Parse a YAML preset book and check that it is usable.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let book: PresetBook = serde_yaml::from_str(yaml).context("parsing preset YAML")?;
        book.validate()?;
        Ok(book)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("reading preset file {:?}", path))?;
        let book = Self::from_yaml_str(&yaml)
            .with_context(|| format!("loading presets from {:?}", path))?;
        debug!(presets = book.presets.len(), default = %book.default, "loaded presets");
        Ok(book)
    }

    fn validate(&self) -> Result<()> {
        for (i, p) in self.presets.iter().enumerate() {
            if self.presets[..i].iter().any(|q| q.name == p.name) {
                bail!("duplicate preset `{}`", p.name);
            }
        }
        if self.get(&self.default).is_none() {
            bail!("default preset `{}` is not defined", self.default);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn default_spec(&self) -> Result<ColumnSpec> {
        self.get(&self.default)
            .map(Preset::spec)
            .ok_or_else(|| anyhow!("default preset `{}` is not defined", self.default))
    }

    /// Name of the first preset whose columns equal `spec`.
    pub fn matching(&self, spec: &ColumnSpec) -> Option<&str> {
        self.presets
            .iter()
            .find(|p| p.key == spec.key && p.value == spec.value)
            .map(|p| p.name.as_str())
    }

    /// Start from `preset` (or the default) and replace either column name.
    pub fn resolve(
        &self,
        preset: Option<&str>,
        key: Option<String>,
        value: Option<String>,
    ) -> Result<ColumnSpec> {
        let mut spec = match preset {
            Some(name) => self
                .get(name)
                .map(Preset::spec)
                .ok_or_else(|| {
                    let known: Vec<&str> = self.presets.iter().map(|p| p.name.as_str()).collect();
                    anyhow!("unknown preset `{}` (known: {})", name, known.join(", "))
                })?,
            None => self.default_spec()?,
        };
        if let Some(key) = key {
            spec.key = key;
        }
        if let Some(value) = value {
            spec.value = value;
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_is_mailing_list_columns() -> Result<()> {
        let book = PresetBook::default();
        assert_eq!(book.default_spec()?, ColumnSpec::new("MLアドレス", "MLメンバー"));
        assert_eq!(book.presets.len(), 2);
        Ok(())
    }

    #[test]
    fn resolve_with_overrides() -> Result<()> {
        let book = PresetBook::default();
        assert_eq!(
            book.resolve(Some("ml-en"), None, None)?,
            ColumnSpec::new("ML Address", "ML Members")
        );
        assert_eq!(
            book.resolve(None, None, Some("Members".into()))?,
            ColumnSpec::new("MLアドレス", "Members")
        );
        assert_eq!(
            book.resolve(Some("ml"), Some("K".into()), Some("V".into()))?,
            ColumnSpec::new("K", "V")
        );
        Ok(())
    }

    #[test]
    fn unknown_preset_lists_known_names() {
        let err = PresetBook::default()
            .resolve(Some("nope"), None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown preset `nope` (known: ml, ml-en)");
    }

    #[test]
    fn matching_preset() {
        let book = PresetBook::default();
        assert_eq!(book.matching(&ColumnSpec::new("MLアドレス", "MLメンバー")), Some("ml"));
        assert_eq!(book.matching(&ColumnSpec::new("ML Address", "ML Members")), Some("ml-en"));
        assert_eq!(book.matching(&ColumnSpec::new("MLメンバー", "MLアドレス")), None);
    }

    #[test]
    fn load_yaml_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            "default: groups\npresets:\n  - name: groups\n    key: Group\n    value: Members\n"
        )?;
        let book = PresetBook::from_yaml_file(tmp.path())?;
        assert_eq!(book.default_spec()?, ColumnSpec::new("Group", "Members"));
        assert!(book.get("ml").is_none());
        Ok(())
    }

    #[test]
    fn rejects_undefined_default() {
        let err = PresetBook::from_yaml_str("default: x\npresets: []\n").unwrap_err();
        assert!(err.to_string().contains("`x` is not defined"), "{err}");
    }

    #[test]
    fn rejects_duplicate_names() {
        let yaml = "default: a\npresets:\n  - {name: a, key: k, value: v}\n  - {name: a, key: k2, value: v2}\n";
        assert!(PresetBook::from_yaml_str(yaml).is_err());
    }
}
