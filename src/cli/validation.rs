use crate::cli::args::CliArgs;
use crate::events::Action;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(n) = args.items_per_page {
        if n == 0 {
            return Err("invalid items-per-page, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.multiplier.as_deref() {
        crate::utils::parse_multiplier(raw)
            .map_err(|e| format!("invalid --multiplier '{raw}': {e}"))?;
    }
    if let Some(raw) = args.category_multipliers.as_deref() {
        crate::utils::parse_category_multipliers_csv(raw)
            .map_err(|e| format!("invalid --category-multipliers '{raw}': {e}"))?;
    }
    if let Some(raw) = args.page_size_options.as_deref() {
        crate::utils::parse_page_sizes_csv(raw)
            .map_err(|e| format!("invalid --page-size-options '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.endpoint.as_deref() {
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --endpoint '{raw}': {e}"))?;
    }
    if args.memory && args.storage.is_some() {
        return Err("use either --storage or --memory, not both".to_string());
    }
    for raw in &args.action {
        Action::parse(raw).map_err(|e| format!("invalid --action '{raw}': {e}"))?;
    }
    Ok(())
}
