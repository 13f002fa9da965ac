use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::currency::CurrencyFormat;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "url")]
    pub endpoint: Option<String>,
    pub items_per_page: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
    pub storage: Option<String>,
    pub price_multiplier: Option<f64>,
    pub category_multipliers: Option<BTreeMap<String, f64>>,
    pub currency: Option<CurrencyFormat>,
    pub timeout: Option<u64>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

fn app_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".storefront"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(app_dir()?.join("config.yml"))
}

pub fn default_storage_path() -> Option<PathBuf> {
    Some(app_dir()?.join("storage.json"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
}

fn default_config_yaml() -> String {
    r#"# Storefront config
#
# Location (default):
#   ~/.storefront/config.yml

# Catalog
endpoint: https://dummyjson.com/products?limit=0
timeout: 30

# Prices from the catalog are multiplied into the display currency.
price_multiplier: 15000
# Per-category overrides (price_multiplier is the fallback):
# category_multipliers:
#   groceries: 14500
#   laptops: 16000

# Pagination
items_per_page: 10
page_size_options: [5, 10, 20, 50]

# Cart persistence (JSON file)
# storage: ~/.storefront/storage.json

# Currency
# currency:
#   symbol: Rp
#   thousands_separator: "."
#   decimal_separator: ","
#   fraction_digits: 2
#   space_after_symbol: true

# Output (optional)
# output: ./storefront.html
# output_format: html

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg = parse_config(&default_config_yaml()).unwrap();
        assert_eq!(cfg.items_per_page, Some(10));
        assert_eq!(cfg.price_multiplier, Some(15000.0));
        assert_eq!(cfg.page_size_options, Some(vec![5, 10, 20, 50]));
        assert_eq!(cfg.no_color, Some(false));
        assert!(cfg.category_multipliers.is_none());
    }

    #[test]
    fn nested_currency_and_category_table() {
        let cfg = parse_config(
            r#"
url: http://localhost:9000/products
category_multipliers:
  laptops: 16000
currency:
  symbol: "$"
  thousands_separator: ","
  decimal_separator: "."
"#,
        )
        .unwrap();
        assert_eq!(cfg.endpoint.as_deref(), Some("http://localhost:9000/products"));
        assert_eq!(
            cfg.category_multipliers.unwrap().get("laptops"),
            Some(&16000.0)
        );
        let currency = cfg.currency.unwrap();
        assert_eq!(currency.symbol, "$");
        assert_eq!(currency.fraction_digits, 2);
    }

    #[test]
    fn empty_file_is_default() {
        let cfg = parse_config("  \n").unwrap();
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn missing_file_is_allowed_when_requested() {
        let path = std::env::temp_dir().join("storefront-config-that-does-not-exist.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }
}
