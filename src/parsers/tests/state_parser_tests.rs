use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::filter::LinkFilter;
use crate::parsers::state;
use crate::results::{DESCRIPTION_MISSING, NAME_NOT_FOUND, PRICE_MISSING};
use serde_json::json;
use url::Url;

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://uzum.uz/ru/product/kettle-42";

    fn normalize(raw: serde_json::Value) -> crate::error::Result<crate::results::ProductRecord> {
        state::normalize(&raw, URL, &ScraperConfig::default())
    }

    #[test]
    fn test_name_only_object_keeps_every_other_default() {
        let record = normalize(json!({"name": "Электрочайник"})).unwrap();

        assert_eq!(record.name, "Электрочайник");
        assert_eq!(record.description, DESCRIPTION_MISSING);
        assert_eq!(record.price_display, PRICE_MISSING);
        assert_eq!(record.price_numeric, 0);
        assert!(record.images().is_empty());
        assert_eq!(record.images_joined(), "");
        assert!(record.colors().is_empty());
        assert_eq!(record.colors_joined(), "");
        assert!(record.availability);
        assert_eq!(record.source_url, URL);
    }

    #[test]
    fn test_title_wins_over_name_and_blank_values_are_skipped() {
        let record = normalize(json!({"title": "Kettle", "name": "Чайник"})).unwrap();
        assert_eq!(record.name, "Kettle");

        let record = normalize(json!({"title": "  ", "name": "Чайник"})).unwrap();
        assert_eq!(record.name, "Чайник");

        let record = normalize(json!({"title": ""})).unwrap();
        assert_eq!(record.name, NAME_NOT_FOUND);
    }

    #[test]
    fn test_description_falls_back_to_detail() {
        let record = normalize(json!({"detail": {"description": "Nested text"}})).unwrap();
        assert_eq!(record.description, "Nested text");

        let record = normalize(json!({
            "description": "Top level",
            "detail": {"description": "Nested text"}
        }))
        .unwrap();
        assert_eq!(record.description, "Top level");
    }

    #[test]
    fn test_object_price_is_grouped() {
        let record = normalize(json!({"price": {"current": 150000}})).unwrap();

        assert!(record.price_display.contains("150,000"));
        assert_eq!(record.price_display, "150,000 сум");
        assert_eq!(record.price_numeric, 150000);
    }

    #[test]
    fn test_price_variants() {
        // Zero current falls through to the nested price
        let record = normalize(json!({"price": {"current": 0, "price": 2500}})).unwrap();
        assert_eq!(record.price_numeric, 2500);

        // Scalar prices, floats are rounded
        let record = normalize(json!({"price": 1234567.6})).unwrap();
        assert_eq!(record.price_display, "1,234,568 сум");
        assert_eq!(record.price_numeric, 1234568);

        let record = normalize(json!({"price": "89000"})).unwrap();
        assert_eq!(record.price_numeric, 89000);

        // Zero, negative and null prices keep the sentinel
        for raw in [json!({"price": 0}), json!({"price": -5}), json!({"price": null})] {
            let record = normalize(raw).unwrap();
            assert_eq!(record.price_display, PRICE_MISSING);
            assert_eq!(record.price_numeric, 0);
        }
    }

    #[test]
    fn test_price_uses_configured_currency_label() {
        let config = ScraperConfig {
            currency_label: "UZS".to_string(),
            ..ScraperConfig::default()
        };
        let record = state::normalize(&json!({"price": 5000}), URL, &config).unwrap();
        assert_eq!(record.price_display, "5,000 UZS");
    }

    #[test]
    fn test_protocol_relative_images_get_https() {
        let record = normalize(json!({
            "photos": ["//images.uzum.uz/a/1.jpg", "//images.uzum.uz/a/2.jpg"]
        }))
        .unwrap();

        assert_eq!(record.images().len(), 2);
        assert!(record.images().iter().all(|i| i.starts_with("https://")));
        assert_eq!(record.images_joined(), record.images().join(","));
    }

    #[test]
    fn test_root_relative_images_get_base_url() {
        let record = normalize(json!({"images": ["/img.jpg", "/media/2.jpg"]})).unwrap();

        assert!(record.images().iter().all(|i| i.starts_with("https://uzum.uz/")));
        assert_eq!(
            record.images_joined(),
            "https://uzum.uz/img.jpg,https://uzum.uz/media/2.jpg"
        );
    }

    #[test]
    fn test_image_objects_and_candidate_order() {
        let record = normalize(json!({
            "photos": [],
            "images": [
                {"src": "https://cdn/1.jpg", "url": "https://cdn/preferred.jpg"},
                {"original": "https://cdn/2.jpg"},
                {"path": "/p/3.jpg"},
                {"width": 800},
                42
            ],
            "gallery": ["https://cdn/never.jpg"]
        }))
        .unwrap();

        assert_eq!(
            record.images(),
            [
                "https://cdn/preferred.jpg",
                "https://cdn/2.jpg",
                "https://uzum.uz/p/3.jpg"
            ]
        );
    }

    #[test]
    fn test_non_string_image_url_fails_normalization() {
        let result = normalize(json!({"photos": [{"url": {"high": "x"}}]}));
        assert!(matches!(result, Err(ScrapeError::Normalization(_))));
    }

    #[test]
    fn test_colors_without_name_are_dropped() {
        let record = normalize(json!({
            "colors": [
                {"name": "Красный", "id": 12},
                {"name": "", "id": 13},
                {"id": 14},
                {"name": "Синий"},
                "Зелёный"
            ]
        }))
        .unwrap();

        assert_eq!(record.colors().len(), 2);
        assert_eq!(record.colors()[0].id, "12");
        assert_eq!(record.colors()[1].id, "");
        assert!(record.colors().iter().all(|c| !c.name.is_empty()));
        assert_eq!(record.colors_joined(), "Красный,Синий");
    }

    #[test]
    fn test_availability_resolution() {
        assert!(!normalize(json!({"availableAmount": 0})).unwrap().availability);
        assert!(normalize(json!({"availableAmount": 3})).unwrap().availability);
        assert!(
            normalize(json!({"availableAmount": 3, "inStock": false}))
                .unwrap()
                .availability
        );
        assert!(!normalize(json!({"inStock": false})).unwrap().availability);
        assert!(normalize(json!({})).unwrap().availability);
        assert!(normalize(json!({"availableAmount": "many"})).is_err());
    }

    #[test]
    fn test_unusable_shapes_fail_normalization() {
        for raw in [
            json!(["not", "an", "object"]),
            json!("string"),
            json!({"price": "по запросу"}),
            json!({"price": [100]}),
        ] {
            let result = normalize(raw.clone());
            assert!(
                matches!(result, Err(ScrapeError::Normalization(_))),
                "{} should fail",
                raw
            );
        }
    }

    #[test]
    fn test_product_links_from_listing_objects() {
        let page = Url::parse("https://uzum.uz/ru/shop/acme").unwrap();
        let raw = json!([
            {"productId": 101, "title": "Lamp"},
            {"productId": "202", "title": "Chair"},
            {"id": 3, "title": "Desk", "url": "/ru/product/desk-3?skuId=1"},
            {"id": 4, "title": "Off site", "url": "https://elsewhere.com/product/4"},
            {"title": "No id"},
            "junk"
        ]);

        let links = state::product_links(&raw, &page, "https://uzum.uz", &LinkFilter::default());

        assert_eq!(
            links,
            vec![
                "https://uzum.uz/product/101",
                "https://uzum.uz/product/202",
                "https://uzum.uz/ru/product/desk-3",
            ]
        );
        assert!(state::product_links(&json!(null), &page, "https://uzum.uz", &LinkFilter::default()).is_empty());
    }

    #[test]
    fn test_category_objects_are_not_product_links() {
        let page = Url::parse("https://uzum.uz/ru/shop/acme").unwrap();
        let raw = json!([
            {"id": 10014, "title": "Электроника"},
            {"id": 10020, "title": "Одежда", "url": "/ru/category/odezhda-10020"},
            {"id": 7, "title": "Priced but no link", "sellPrice": 1000},
            {"productId": 501, "title": "Kettle", "sellPrice": 150000},
        ]);

        let links = state::product_links(&raw, &page, "https://uzum.uz", &LinkFilter::default());

        assert_eq!(links, vec!["https://uzum.uz/product/501"]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!state::is_truthy(&json!(null)));
        assert!(!state::is_truthy(&json!({})));
        assert!(!state::is_truthy(&json!([])));
        assert!(!state::is_truthy(&json!(0)));
        assert!(state::is_truthy(&json!({"title": "x"})));
    }
}
