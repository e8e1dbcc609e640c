//! Runtime settings.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and environment variables named `TAXOMERGE__<SECTION>__<KEY>`
//! (list values are comma separated). `TAXONOMY_DATA_PATH` is honored as an
//! alias for `TAXOMERGE__TAXONOMY__DATA_DIR`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{Result, TaxomergeError};
use crate::merge::MergePolicy;
use crate::vocab::skos;

pub const DEFAULT_FILE: &str = "taxomerge.toml";
const DATA_PATH_VARIABLE: &str = "TAXONOMY_DATA_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaxonomySettings {
    pub data_dir: PathBuf,
    /// Statement files below `data_dir`, loaded in this order.
    pub files: Vec<String>,
}

impl Default for TaxonomySettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/tmp/taxonomy-data/export/1.25"),
            files: [
                "Skill.nq",
                "OccupationName.nq",
                "JobTitle.nq",
                "Region.nq",
                "Country.nq",
                "SsykLevel4.nq",
                "EscoSkill.nq",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Predicates that carry at most one value per subject.
    pub single_valued: Vec<String>,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            single_valued: vec![skos::PREF_LABEL.into(), skos::DEFINITION.into()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub taxonomy: TaxonomySettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub merge: MergeSettings,
}

impl Settings {
    /// Reads `file` (or `taxomerge.toml` when absent and present on disk),
    /// then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let builder = Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix("TAXOMERGE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("taxonomy.files")
                    .with_list_parse_key("merge.single_valued")
                    .try_parsing(true),
            )
            .set_override_option("taxonomy.data_dir", std::env::var(DATA_PATH_VARIABLE).ok())?;
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from TOML text alone, without looking at files or the environment.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.taxonomy.files.is_empty() {
            return Err(TaxomergeError::Config("taxonomy.files is empty".into()));
        }
        if self.search.default_limit == 0 || self.search.max_limit == 0 {
            return Err(TaxomergeError::Config("search limits must be positive".into()));
        }
        if self.search.default_limit > self.search.max_limit {
            return Err(TaxomergeError::Config(format!(
                "search.default_limit {} exceeds search.max_limit {}",
                self.search.default_limit, self.search.max_limit
            )));
        }
        self.merge_policy().map(|_| ())
    }

    pub fn merge_policy(&self) -> Result<MergePolicy> {
        MergePolicy::from_iris(&self.merge.single_valued)
            .map_err(|e| TaxomergeError::Config(format!("merge.single_valued: {e}")))
    }

    /// The limit to use for a search that asked for `requested` results.
    pub fn search_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.search.default_limit)
            .min(self.search.max_limit)
            .max(1)
    }
}
