use crate::controller::StorefrontView;
use crate::view::ALL_CATEGORIES;

pub const PRODUCTS_CONTAINER_ID: &str = "products-container";
pub const PAGINATION_ID: &str = "pagination";
pub const PAGE_NUMBER_ID: &str = "page-number";
pub const CART_ITEMS_ID: &str = "cart-items";
pub const TOTAL_ITEMS_ID: &str = "total-items";
pub const TOTAL_PRICE_ID: &str = "total-price";
pub const ITEMS_PER_PAGE_ID: &str = "items-per-page";
pub const CATEGORY_FILTER_ID: &str = "category-filter";

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_products(view: &StorefrontView) -> String {
    let mut out = format!("<div id=\"{PRODUCTS_CONTAINER_ID}\">\n");
    for p in &view.products {
        let title = escape_html(&p.title);
        out.push_str(&format!(
            concat!(
                "  <div class=\"product-card\" data-product-id=\"{id}\">\n",
                "    <h3>{title}</h3>\n",
                "    <img src=\"{thumb}\" alt=\"{title}\">\n",
                "    <p>Price: {price}</p>\n",
                "    <button type=\"button\" data-action=\"add-to-cart\" data-product-id=\"{id}\">Add to Cart</button>\n",
                "  </div>\n"
            ),
            id = p.id,
            title = title,
            thumb = escape_html(&p.thumbnail),
            price = escape_html(&view.format_price(p.price)),
        ));
    }
    out.push_str("</div>\n");
    out
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        ""
    } else {
        " disabled"
    }
}

/// Navigation is rendered `hidden` when everything fits on one page.
pub fn render_pagination(view: &StorefrontView) -> String {
    let page = &view.page;
    let hidden = if page.visible { "" } else { " hidden" };
    let mut out = format!("<div id=\"{PAGINATION_ID}\"{hidden}>\n");
    out.push_str(&format!(
        "  <button type=\"button\" data-action=\"prev-page\"{}>Previous</button>\n",
        disabled(page.has_prev)
    ));
    out.push_str(&format!(
        "  <span id=\"{PAGE_NUMBER_ID}\">{}</span>\n",
        escape_html(&page.label())
    ));
    for n in 1..=page.total {
        let current = if n == page.current {
            " aria-current=\"page\""
        } else {
            ""
        };
        out.push_str(&format!(
            "  <button type=\"button\" data-action=\"go-to-page\" value=\"{n}\"{current}>{n}</button>\n"
        ));
    }
    out.push_str(&format!(
        "  <button type=\"button\" data-action=\"next-page\"{}>Next</button>\n",
        disabled(page.has_next)
    ));
    out.push_str("</div>\n");
    out
}

pub fn render_controls(view: &StorefrontView) -> String {
    let mut out = format!(
        "<select id=\"{ITEMS_PER_PAGE_ID}\" data-action=\"set-page-size\">\n"
    );
    for size in &view.page_size_options {
        let selected = if *size == view.page_size {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "  <option value=\"{size}\"{selected}>{size}</option>\n"
        ));
    }
    out.push_str("</select>\n");

    out.push_str(&format!(
        "<select id=\"{CATEGORY_FILTER_ID}\" data-action=\"filter-category\">\n"
    ));
    let mut options = vec![ALL_CATEGORIES.to_string()];
    options.extend(view.categories.iter().cloned());
    for category in options {
        let selected = if category == view.active_category {
            " selected"
        } else {
            ""
        };
        let escaped = escape_html(&category);
        out.push_str(&format!(
            "  <option value=\"{escaped}\"{selected}>{escaped}</option>\n"
        ));
    }
    out.push_str("</select>\n");
    out
}

pub fn render_cart(view: &StorefrontView) -> String {
    let mut out = format!("<div id=\"{CART_ITEMS_ID}\">\n");
    for item in &view.cart {
        out.push_str(&format!(
            concat!(
                "  <div class=\"cart-item\" data-product-id=\"{id}\">\n",
                "    <p>{title} - {price} (x{qty})</p>\n",
                "    <button type=\"button\" data-action=\"remove-one\" data-product-id=\"{id}\">-</button>\n",
                "    <button type=\"button\" data-action=\"remove-all\" data-product-id=\"{id}\">Remove</button>\n",
                "    <button type=\"button\" data-action=\"add-to-cart\" data-product-id=\"{id}\">+</button>\n",
                "  </div>\n"
            ),
            id = item.product.id,
            title = escape_html(&item.product.title),
            price = escape_html(&view.format_price(item.product.price)),
            qty = item.quantity,
        ));
    }
    out.push_str("</div>\n");
    out.push_str(&format!(
        "<p>Items: <span id=\"{TOTAL_ITEMS_ID}\">{}</span></p>\n",
        view.total_items
    ));
    out.push_str(&format!(
        "<p>Total: <span id=\"{TOTAL_PRICE_ID}\">{}</span></p>\n",
        escape_html(&view.format_price(view.total_price))
    ));
    out.push_str("<button type=\"button\" data-action=\"checkout\">Checkout</button>\n");
    out
}

// Listeners are registered once on the document and re-emit every
// data-action as a `storefront:action` event for the host to dispatch.
const LISTENER_SCRIPT: &str = r#"<script>
document.addEventListener("click", (e) => {
  const el = e.target.closest("button[data-action]");
  if (!el || el.disabled) return;
  document.dispatchEvent(new CustomEvent("storefront:action", {
    detail: { action: el.dataset.action, productId: el.dataset.productId, value: el.value },
  }));
});
document.addEventListener("change", (e) => {
  const el = e.target.closest("select[data-action]");
  if (!el) return;
  document.dispatchEvent(new CustomEvent("storefront:action", {
    detail: { action: el.dataset.action, value: el.value },
  }));
});
</script>"#;

pub fn render_page(view: &StorefrontView) -> Vec<u8> {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Storefront</title>
</head>
<body>
<main>
<section class="controls">
{controls}</section>
<section class="catalog">
{products}{pagination}</section>
<aside class="cart">
<h2>Cart</h2>
{cart}</aside>
</main>
{script}
</body>
</html>
"#,
        controls = render_controls(view),
        products = render_products(view),
        pagination = render_pagination(view),
        cart = render_cart(view),
        script = LISTENER_SCRIPT,
    );
    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Action;
    use crate::output::tests::sample_view;

    #[test]
    fn product_cards_are_escaped_and_carry_actions() {
        let html = render_products(&sample_view());
        assert!(html.contains("<h3>Item &lt;1&gt; &amp; co</h3>"));
        assert!(html.contains("data-action=\"add-to-cart\" data-product-id=\"2\""));
        assert!(!html.contains("data-product-id=\"3\""));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn pagination_disables_edges_and_hides_single_page() {
        let mut view = sample_view();
        let html = render_pagination(&view);
        assert!(html.contains("<div id=\"pagination\">"));
        assert!(html.contains("data-action=\"prev-page\" disabled"));
        assert!(!html.contains("data-action=\"next-page\" disabled"));
        assert!(html.contains("Page 1 of 2"));

        view.page.total = 1;
        view.page.visible = false;
        view.page.has_next = false;
        assert!(render_pagination(&view).contains("<div id=\"pagination\" hidden>"));
    }

    #[test]
    fn cart_shows_totals_and_line_actions() {
        let html = render_cart(&sample_view());
        assert!(html.contains("(x2)"));
        assert!(html.contains("<span id=\"total-items\">2</span>"));
        assert!(html.contains("<span id=\"total-price\">Rp\u{a0}30.000,00</span>"));
        assert!(html.contains("data-action=\"remove-one\" data-product-id=\"1\""));
        assert!(html.contains("data-action=\"remove-all\" data-product-id=\"1\""));
    }

    #[test]
    fn controls_mark_active_selection() {
        let html = render_controls(&sample_view());
        assert!(html.contains("<option value=\"2\" selected>2</option>"));
        assert!(html.contains("<option value=\"all\" selected>all</option>"));
        assert!(html.contains("<option value=\"beauty\">beauty</option>"));
    }

    #[test]
    fn rendered_actions_decode_back() {
        let decoded = Action::from_attributes("add-to-cart", Some("2"), None).unwrap();
        assert_eq!(decoded.attribute_name(), "add-to-cart");
        let page = String::from_utf8(render_page(&sample_view())).unwrap();
        assert!(page.contains(&format!("data-action=\"{}\"", decoded.attribute_name())));
        assert!(page.contains("storefront:action"));
    }
}
