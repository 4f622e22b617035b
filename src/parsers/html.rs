use crate::filter::LinkFilter;
use crate::results::{Color, ProductRecord};
use crate::utils::{collapse_whitespace, normalize_url, parse_digits};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

pub const NAME_SELECTORS: [&str; 7] = [
    "h1.title",
    "h1.product-title",
    ".product-title",
    ".product-name",
    "h1[itemprop=\"name\"]",
    ".product-info h1",
    ".product-detail h1",
];

pub const DESCRIPTION_SELECTORS: [&str; 6] = [
    ".product-description",
    ".description",
    "[itemprop=\"description\"]",
    ".product-details",
    ".product-info .description",
    ".details-container",
];

pub const PRICE_SELECTORS: [&str; 6] = [
    ".product-price",
    ".price",
    "[itemprop=\"price\"]",
    ".current-price",
    ".price-current",
    ".product-info .price",
];

pub const IMAGE_SELECTORS: [&str; 5] = [
    ".product-gallery img",
    ".product-images img",
    ".gallery img",
    ".product-photo img",
    ".swiper-slide img",
];

pub const COLOR_SELECTORS: [&str; 3] = [
    ".colors-list .color-item",
    ".color-options .color-option",
    ".color-selector .color",
];

pub const PRODUCT_LINK_SELECTORS: [&str; 3] = [
    "a[href*=\"/product/\"]",
    ".product-card a",
    "[data-test-id=\"product-card\"] a",
];

const OG_IMAGE_SELECTOR: &str = "meta[property=\"og:image\"]";

/// Parses rendered product markup into a record
///
/// Starts from [`ProductRecord::empty`] and fills whatever the selector groups
/// find. Never fails: a page with unfamiliar markup yields a partial or empty
/// record.
pub fn parse_product(html: &str, source_url: &str, base_url: &str) -> ProductRecord {
    ::log::info!("Parsing product markup for {}", source_url);
    let doc = Html::parse_document(html);
    let mut record = ProductRecord::empty(source_url);

    if let Some(name) = first_text(&doc, &NAME_SELECTORS) {
        ::log::info!("Found product name: {}", name);
        record.name = name;
    }

    if let Some(description) = first_text(&doc, &DESCRIPTION_SELECTORS) {
        ::log::debug!(
            "Found product description: {}...",
            description.chars().take(50).collect::<String>()
        );
        record.description = description;
    }

    if let Some(price) = first_text(&doc, &PRICE_SELECTORS) {
        ::log::info!("Found product price: {}", price);
        record.price_numeric = parse_digits(&price).unwrap_or(0);
        record.price_display = price;
    }

    let images = extract_images(&doc, base_url);
    ::log::info!("Found {} product images", images.len());
    record.set_images(images);

    let colors = extract_colors(&doc);
    ::log::debug!("Found {} product colors", colors.len());
    record.set_colors(colors);

    record
}

/// Collects product links from a listing page's anchors
pub fn parse_product_links(html: &str, page_url: &Url, filter: &LinkFilter) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut links = Vec::new();

    for selector in compile(&PRODUCT_LINK_SELECTORS) {
        for href in doc.select(&selector).filter_map(|e| e.value().attr("href")) {
            if let Some(link) = filter.accept(href, page_url) {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
    }

    ::log::debug!("Markup scan found {} product links", links.len());
    links
}

/// Reads the JSON embedded in a `<script id="__NEXT_DATA__">` tag, if any
pub fn embedded_next_data(html: &str) -> Option<Value> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(r#"script[id="__NEXT_DATA__"]"#).ok()?;
    let json_text = doc.select(&selector).next()?.text().collect::<String>();
    serde_json::from_str(&json_text).ok()
}

/// Compiles selectors, logging and skipping any that do not parse
fn compile<'a>(selectors: &'a [&'a str]) -> impl Iterator<Item = Selector> + 'a {
    selectors.iter().filter_map(|s| match Selector::parse(s) {
        Ok(selector) => Some(selector),
        Err(e) => {
            ::log::warn!("Skipping invalid selector {}: {:?}", s, e);
            None
        }
    })
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text of the first element with non-empty text, from the first selector that has one
fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    compile(selectors).find_map(|selector| {
        doc.select(&selector)
            .map(|e| element_text(&e))
            .find(|text| !text.is_empty())
    })
}

fn extract_images(doc: &Html, base_url: &str) -> Vec<String> {
    let mut images = Vec::new();

    for selector in compile(&IMAGE_SELECTORS) {
        let elements: Vec<_> = doc.select(&selector).collect();
        if elements.is_empty() {
            continue;
        }

        for img in elements {
            let src = ["src", "data-src"]
                .iter()
                .filter_map(|attr| img.value().attr(attr))
                .map(str::trim)
                .find(|src| !src.is_empty());
            if let Some(src) = src {
                images.push(normalize_url(src, base_url));
            }
        }
        break;
    }

    if images.is_empty() {
        let og_image = compile(&[OG_IMAGE_SELECTOR])
            .find_map(|selector| doc.select(&selector).next())
            .and_then(|meta| meta.value().attr("content"))
            .map(str::trim)
            .filter(|content| !content.is_empty());
        if let Some(content) = og_image {
            ::log::info!("Using og:image as product image: {}", content);
            images.push(normalize_url(content, base_url));
        }
    }

    images
}

fn extract_colors(doc: &Html) -> Vec<Color> {
    for selector in compile(&COLOR_SELECTORS) {
        let elements: Vec<_> = doc.select(&selector).collect();
        if elements.is_empty() {
            continue;
        }

        return elements
            .iter()
            .filter_map(|elem| {
                let value = elem.value();
                let name = ["title", "data-color"]
                    .iter()
                    .filter_map(|attr| value.attr(attr))
                    .map(str::trim)
                    .find(|name| !name.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| element_text(elem));
                if name.is_empty() {
                    return None;
                }
                Some(Color {
                    name,
                    id: value.attr("data-id").unwrap_or_default().trim().to_string(),
                })
            })
            .collect();
    }

    Vec::new()
}
