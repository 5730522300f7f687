use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tables shipped with the binary. A `config.json` in the working directory replaces them.
const BUILTIN_CONFIG: &str = include_str!("../config.json");

#[derive(Debug, Clone, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Value sub-line rule: for `brand` models mentioning `trigger` but not `inject`,
/// `inject` is written right after the brand token.
#[derive(Debug, Clone, Deserialize)]
pub struct SubBrandRule {
    pub brand: String,
    pub trigger: String,
    pub inject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorGroupConfig {
    pub canonical: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Header labels of the store export.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreColumns {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub ram: String,
    pub storage: String,
    pub color: String,
    pub code: String,
}

impl Default for StoreColumns {
    fn default() -> Self {
        Self {
            name: "Наименование".into(),
            brand: "Производитель".into(),
            model: "Модель".into(),
            ram: "Оперативная память (Gb)".into(),
            storage: "Встроенная память".into(),
            color: "Цвет".into(),
            code: "Внешний код".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub keyword_weight: f64,
    pub model_exact_bonus: f64,
    pub brand_match_bonus: f64,
    pub similarity_threshold: f64,
    pub similarity_divisor: f64,
    pub similarity_miss_penalty: f64,
    pub brand_mismatch_penalty: f64,
    pub ram_match_bonus: f64,
    pub storage_match_bonus: f64,
    pub color_match_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 1.5,
            model_exact_bonus: 30.0,
            brand_match_bonus: 20.0,
            similarity_threshold: 83.0,
            similarity_divisor: 5.0,
            similarity_miss_penalty: 15.0,
            brand_mismatch_penalty: 50.0,
            ram_match_bonus: 15.0,
            storage_match_bonus: 15.0,
            color_match_bonus: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub brands: Vec<BrandConfig>,
    #[serde(default)]
    pub sub_brand_rules: Vec<SubBrandRule>,
    #[serde(default)]
    pub color_groups: Vec<ColorGroupConfig>,
    #[serde(default)]
    pub store_columns: StoreColumns,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_config(BUILTIN_CONFIG)
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

/// Uses `path` when it exists, the built-in tables otherwise.
pub fn load_config_or_builtin(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        AppConfig::builtin()
    }
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    if config.brands.is_empty() {
        return Err(ConfigError::Invalid("brand table is empty".into()));
    }
    if config.scoring.similarity_divisor == 0.0 {
        return Err(ConfigError::Invalid("similarity_divisor must be non-zero".into()));
    }
    Ok(config)
}
