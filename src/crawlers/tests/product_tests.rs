use super::{FakeDocument, FakePage};
use crate::config::ScraperConfig;
use crate::crawlers::probe::default_probes;
use crate::crawlers::product::fetch_product;
use serde_json::json;

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://uzum.uz/ru/product/desk-5";

    const MARKUP: &str = r#"
        <h1 class="product-title">Desk from markup</h1>
        <span class="price">450 000 сум</span>
    "#;

    #[tokio::test]
    async fn test_client_state_is_preferred() {
        let page = FakePage::new(vec![
            FakeDocument::default()
                .with_html(MARKUP)
                .with_script(
                    "initial-state",
                    Ok(json!({
                        "title": "Desk from state",
                        "price": {"current": 450000},
                        "photos": [{"url": "//images.uzum.uz/desk.jpg"}],
                        "colors": [{"name": "Oak", "id": 1}],
                        "availableAmount": 0
                    })),
                ),
        ]);

        let record = fetch_product(&page, URL, &ScraperConfig::without_delays(), &default_probes())
            .await
            .unwrap();

        assert_eq!(page.visited(), vec![URL]);
        assert_eq!(record.name, "Desk from state");
        assert_eq!(record.price_display, "450,000 сум");
        assert_eq!(record.images_joined(), "https://images.uzum.uz/desk.jpg");
        assert_eq!(record.colors_joined(), "Oak");
        assert!(!record.availability);
        assert_eq!(record.source_url, URL);
    }

    #[tokio::test]
    async fn test_markup_fallback_when_no_probe_matches() {
        let page = FakePage::new(vec![FakeDocument::default().with_html(MARKUP)]);

        let record = fetch_product(&page, URL, &ScraperConfig::without_delays(), &default_probes())
            .await
            .unwrap();

        assert_eq!(record.name, "Desk from markup");
        assert_eq!(record.price_numeric, 450000);
        assert_eq!(record.price_display, "450 000 сум");
    }

    #[tokio::test]
    async fn test_markup_fallback_when_normalization_fails() {
        let page = FakePage::new(vec![
            FakeDocument::default()
                .with_html(MARKUP)
                .with_script("nuxt", Ok(json!({"title": "Broken", "price": [1, 2]}))),
        ]);

        let record = fetch_product(&page, URL, &ScraperConfig::without_delays(), &default_probes())
            .await
            .unwrap();

        assert_eq!(record.name, "Desk from markup");
    }

    #[tokio::test]
    async fn test_unreadable_page_gives_empty_record() {
        let page = FakePage::new(vec![FakeDocument::default()]);

        let record = fetch_product(&page, URL, &ScraperConfig::without_delays(), &default_probes())
            .await
            .unwrap();

        assert!(record.is_empty());
        assert_eq!(record.source_url, URL);
    }

    #[tokio::test]
    async fn test_navigation_failure_is_an_error() {
        let page = FakePage::unreachable();

        let result =
            fetch_product(&page, URL, &ScraperConfig::without_delays(), &default_probes()).await;

        assert!(result.is_err());
        assert!(page.executed().is_empty());
    }
}
