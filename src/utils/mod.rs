use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

pub fn parse_page_sizes_csv(value: &str) -> Result<Vec<usize>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("page size list is empty".to_string());
    }
    let mut out: Vec<usize> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let size: usize = item
            .parse()
            .map_err(|_| format!("invalid page size '{item}'"))?;
        if size == 0 {
            return Err("page size must be a positive integer".to_string());
        }
        if seen.insert(size) {
            out.push(size);
        }
    }
    if out.is_empty() {
        return Err("page size list is empty".to_string());
    }
    out.sort_unstable();
    Ok(out)
}

pub fn parse_multiplier(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    let factor: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid multiplier '{trimmed}'"))?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err("multiplier must be a positive number".to_string());
    }
    Ok(factor)
}

/// Parses `category=factor` pairs, e.g. `beauty=16000,groceries=14500`.
pub fn parse_category_multipliers_csv(value: &str) -> Result<BTreeMap<String, f64>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("category multiplier list is empty".to_string());
    }
    let mut out = BTreeMap::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let (category, factor) = item
            .split_once('=')
            .ok_or_else(|| format!("expected CATEGORY=FACTOR, got '{item}'"))?;
        let category = category.trim();
        if category.is_empty() {
            return Err(format!("missing category in '{item}'"));
        }
        out.insert(category.to_string(), parse_multiplier(factor)?);
    }
    if out.is_empty() {
        return Err("category multiplier list is empty".to_string());
    }
    Ok(out)
}
