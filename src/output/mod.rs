pub mod html;

use colored::Colorize;

use crate::controller::{Notice, StorefrontView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn render(format: OutputFormat, view: &StorefrontView) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => render_json(view),
        OutputFormat::Html => Ok(html::render_page(view)),
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Terminal listing of the current page and the cart. Colour follows the
/// global `colored` override, so callers switch it off once at startup.
pub fn render_text(view: &StorefrontView) -> Vec<u8> {
    let mut out = String::new();

    let page = if view.page.total == 0 {
        "no products".to_string()
    } else {
        view.page.label()
    };
    out.push_str(&format!(
        ":: {:<10}: {} ({} shown of {}, category {}, {} per page)\n",
        "Products",
        page.bold(),
        view.products.len(),
        view.filtered_count,
        view.active_category.cyan(),
        view.page_size
    ));
    for p in &view.products {
        out.push_str(&format!(
            "  [{:>4}] {:<40} {:>20}  {}\n",
            p.id.to_string().yellow(),
            truncate(&p.title, 40),
            view.format_price(p.price).green(),
            p.category.dimmed()
        ));
    }
    if view.page.visible {
        let mut nav: Vec<&str> = Vec::new();
        if view.page.has_prev {
            nav.push("prev");
        }
        if view.page.has_next {
            nav.push("next");
        }
        nav.push("page N");
        out.push_str(&format!(":: {:<10}: {}\n", "Navigate", nav.join(" | ")));
    }

    out.push('\n');
    out.push_str(&format!(
        ":: {:<10}: {} items, {}\n",
        "Cart",
        view.total_items.to_string().bold(),
        view.format_price(view.total_price).bold().green()
    ));
    for item in &view.cart {
        out.push_str(&format!(
            "  [{:>4}] {:<40} x{:<3} {:>20}\n",
            item.product.id.to_string().yellow(),
            truncate(&item.product.title, 40),
            item.quantity,
            view.format_price(item.subtotal())
        ));
    }
    out.into_bytes()
}

pub fn render_json(view: &StorefrontView) -> Result<Vec<u8>, serde_json::Error> {
    let mut body = serde_json::to_vec_pretty(view)?;
    body.push(b'\n');
    Ok(body)
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Info(message) => format!(
            "{}{}{} {}",
            "[".bold().white(),
            "INF".bold().blue(),
            "]".bold().white(),
            message.bold().white()
        ),
        Notice::Error(message) => format!(
            "{}{}{} {}",
            "[".bold().white(),
            "ERR".bold().red(),
            "]".bold().white(),
            message.bold().white()
        ),
    }
}
