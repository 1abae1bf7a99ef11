use crate::config::Config;
use crate::materials::{MaterialsProjectClient, OxidationStateSource};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn OxidationStateSource>,
}

impl AppState {
    /// State backed by the real Materials Project client
    pub fn new(config: Config) -> Self {
        let source = Arc::new(MaterialsProjectClient::from_config(&config.materials));
        Self { config, source }
    }

    pub fn with_source(config: Config, source: Arc<dyn OxidationStateSource>) -> Self {
        Self { config, source }
    }
}

/// Query string accepted by the relay
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    /// First `query` pair wins when the parameter is repeated
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = pairs
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value);
        Self { query }
    }

    /// The search term if present and non-blank, as the user sent it
    pub fn term(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub api_key_configured: bool,
}

/// Relay success body as the view reads it. Everything besides `data` is ignored.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<MaterialRecord>,
}

// Shape owned by the Materials Project. Every field defaults, whether the
// key is absent or `null`, so that any object the upstream returns still
// renders.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaterialRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub material_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub formula_pretty: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub density: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub symmetry: Symmetry,
    #[serde(deserialize_with = "null_as_default")]
    pub average_oxidation_states: BTreeMap<String, f64>,
    pub nsites: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub elements: Vec<String>,
    pub property_name: Option<String>,
    pub builder_meta: Option<BuilderMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Symmetry {
    #[serde(deserialize_with = "null_as_default")]
    pub crystal_system: String,
    #[serde(deserialize_with = "null_as_default")]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuilderMeta {
    pub emmet_version: Option<String>,
    pub pymatgen_version: Option<String>,
    pub run_id: Option<String>,
    pub database_version: Option<String>,
    pub build_date: Option<String>,
    pub license: Option<String>,
}

impl MaterialRecord {
    /// Card lines in display order, shared by the terminal and one-shot front ends
    pub fn card_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.formula_pretty.clone(),
            format!("Material ID: {}", self.material_id),
            format!("Density: {} g/cm³", self.density),
            format!("Volume: {} Å³", self.volume),
            format!(
                "Symmetry: {} ({})",
                self.symmetry.crystal_system, self.symmetry.symbol
            ),
            "Average Oxidation States:".to_string(),
        ];
        lines.extend(
            self.average_oxidation_states
                .iter()
                .map(|(element, state)| format!("  {}: {}", element, state)),
        );
        lines
    }
}
