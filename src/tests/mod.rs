use std::collections::BTreeMap;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::cart::CART_STORAGE_KEY;
use crate::catalog::{self, PriceRule};
use crate::controller::{Notice, Settings, Storefront, FETCH_FAILED_MESSAGE};
use crate::events::Action;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::view::CategoryFilter;

fn catalog_body(count: u64) -> String {
    let products: Vec<serde_json::Value> = (1..=count)
        .map(|id| {
            let category = if id <= 4 { "beauty" } else { "groceries" };
            serde_json::json!({
                "id": id,
                "title": format!("Product {id}"),
                "description": "ignored",
                "thumbnail": format!("https://cdn.example/{id}/thumbnail.png"),
                "category": category,
                "price": id as f64 + 0.5,
                "rating": 4.5,
            })
        })
        .collect();
    serde_json::json!({ "products": products, "total": count, "skip": 0, "limit": 0 })
        .to_string()
}

/// Answers exactly one request with the given status line and body.
async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/products?limit=0")
}

fn settings(page_size: usize) -> Settings {
    Settings {
        page_size,
        ..Settings::default()
    }
}

fn page_ids<S: KeyValueStore>(sf: &Storefront<S>) -> Vec<u64> {
    sf.view().products.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn fetched_catalog_paginates_in_pages_of_six() {
    let url = serve_once("200 OK", catalog_body(12)).await;
    let client = catalog::build_client(5).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(6)).unwrap();

    assert!(sf.load_catalog(&client, &url).await);
    assert!(sf.take_notices().is_empty());
    assert_eq!(page_ids(&sf), vec![1, 2, 3, 4, 5, 6]);

    sf.dispatch(Action::NextPage).unwrap();
    assert_eq!(page_ids(&sf), vec![7, 8, 9, 10, 11, 12]);

    assert!(!sf.dispatch(Action::GoToPage(3)).unwrap());
    let view = sf.view();
    assert_eq!(view.page.total, 2);
    assert!(!view.page.has_next);
    assert!(crate::view::paginate(&sf.state().filtered, 6, 3).is_empty());
}

#[tokio::test]
async fn fetched_prices_are_normalized() {
    let url = serve_once("200 OK", catalog_body(2)).await;
    let client = catalog::build_client(5).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(10)).unwrap();
    sf.load_catalog(&client, &url).await;
    assert_eq!(sf.state().catalog[0].price, 1.5 * 15000.0);
    assert_eq!(sf.state().catalog[1].price, 2.5 * 15000.0);
}

#[tokio::test]
async fn category_table_prices_per_category() {
    let url = serve_once("200 OK", catalog_body(6)).await;
    let client = catalog::build_client(5).unwrap();
    let rule = PriceRule::ByCategory {
        default_multiplier: 100.0,
        multipliers: BTreeMap::from([("groceries".to_string(), 10.0)]),
    };
    let mut sf = Storefront::new(
        MemoryStore::new(),
        Settings {
            price_rule: rule,
            ..Settings::default()
        },
    )
    .unwrap();
    sf.load_catalog(&client, &url).await;
    let prices: Vec<f64> = sf.state().catalog.iter().map(|p| p.price).collect();
    assert_eq!(prices[0], 150.0);
    assert_eq!(prices[5], 65.0);
}

#[tokio::test]
async fn server_error_leaves_catalog_empty_with_notice() {
    let url = serve_once("500 Internal Server Error", "{}".to_string()).await;
    let client = catalog::build_client(5).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(10)).unwrap();

    assert!(!sf.load_catalog(&client, &url).await);
    assert_eq!(
        sf.take_notices(),
        vec![Notice::Error(FETCH_FAILED_MESSAGE.to_string())]
    );
    let view = sf.view();
    assert!(view.products.is_empty());
    assert_eq!(view.page.total, 0);
    assert!(!view.page.visible);
}

#[tokio::test]
async fn malformed_body_is_treated_as_failure() {
    let url = serve_once("200 OK", "<html>maintenance</html>".to_string()).await;
    let client = catalog::build_client(5).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(10)).unwrap();
    assert!(!sf.load_catalog(&client, &url).await);
    assert!(sf.state().catalog.is_empty());
    assert_eq!(sf.take_notices().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = catalog::build_client(5).unwrap();
    let err = catalog::fetch_catalog(&client, &format!("http://{addr}/"), &PriceRule::default())
        .await
        .unwrap_err();
    assert!(matches!(err, catalog::CatalogError::Request { .. }));
}

#[tokio::test]
async fn status_errors_carry_the_code() {
    let url = serve_once("404 Not Found", "{}".to_string()).await;
    let client = catalog::build_client(5).unwrap();
    let err = catalog::fetch_catalog(&client, &url, &PriceRule::default())
        .await
        .unwrap_err();
    assert!(matches!(err, catalog::CatalogError::Status { status: 404, .. }));
}

#[tokio::test]
async fn filtering_after_fetch_shows_only_that_category() {
    let url = serve_once("200 OK", catalog_body(12)).await;
    let client = catalog::build_client(5).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(3)).unwrap();
    sf.load_catalog(&client, &url).await;

    sf.dispatch(Action::NextPage).unwrap();
    sf.dispatch(Action::FilterCategory(CategoryFilter::parse("beauty")))
        .unwrap();
    assert_eq!(sf.view().page.current, 1);
    assert_eq!(sf.view().filtered_count, 4);
    assert_eq!(sf.view().categories, vec!["beauty", "groceries"]);

    sf.dispatch(Action::FilterCategory(CategoryFilter::All))
        .unwrap();
    assert_eq!(sf.view().filtered_count, 12);
}

#[test]
fn cart_survives_restart_through_file_store() {
    let dir = std::env::temp_dir().join(format!("storefront-restart-{}", std::process::id()));
    let path = dir.join("storage.json");
    let _ = std::fs::remove_dir_all(&dir);

    let products = catalog::decode_catalog(&catalog_body(5), &PriceRule::default()).unwrap();

    let mut sf = Storefront::new(FileStore::new(&path), settings(10)).unwrap();
    sf.set_catalog(products.clone());
    sf.dispatch(Action::AddToCart(2)).unwrap();
    sf.dispatch(Action::AddToCart(2)).unwrap();
    sf.dispatch(Action::AddToCart(5)).unwrap();
    sf.dispatch(Action::RemoveOne(5)).unwrap();
    drop(sf);

    let mut sf = Storefront::new(FileStore::new(&path), settings(10)).unwrap();
    sf.set_catalog(products);
    assert_eq!(sf.cart().len(), 1);
    assert_eq!(sf.cart().get(2).unwrap().quantity, 2);
    assert_eq!(sf.view().total_items, 2);
    assert_eq!(sf.view().total_price, 2.0 * 2.5 * 15000.0);

    sf.dispatch(Action::Checkout).unwrap();
    assert_eq!(FileStore::new(&path).get(CART_STORAGE_KEY).unwrap(), None);
    drop(sf);

    let sf = Storefront::new(FileStore::new(&path), settings(10)).unwrap();
    assert!(sf.cart().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rendered_page_reflects_controller_state() {
    let products = catalog::decode_catalog(&catalog_body(12), &PriceRule::default()).unwrap();
    let mut sf = Storefront::new(MemoryStore::new(), settings(5)).unwrap();
    sf.set_catalog(products);
    sf.dispatch(Action::AddToCart(1)).unwrap();
    sf.dispatch(Action::GoToPage(3)).unwrap();

    let html = String::from_utf8(crate::output::html::render_page(&sf.view())).unwrap();
    assert!(html.contains("Page 3 of 3"));
    assert!(html.contains("<h3>Product 11</h3>"));
    assert!(!html.contains("<h3>Product 1</h3>"));
    assert!(html.contains("<span id=\"total-items\">1</span>"));
    assert!(html.contains("data-action=\"next-page\" disabled"));
    assert!(!html.contains("onclick"));
}
