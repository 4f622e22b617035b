//! Normalization of structured product data read from the page's client state.
//!
//! The marketplace front end has shipped several state shapes over time and
//! each names the same concept differently, so every field is resolved by a
//! small function that tries its candidate keys in a fixed order.

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::filter::LinkFilter;
use crate::results::{Color, ProductRecord};
use crate::utils::{group_thousands, normalize_url};
use serde_json::{Map, Value};
use url::Url;

const NAME_KEYS: [&str; 2] = ["title", "name"];
const IMAGE_LIST_KEYS: [&str; 4] = ["photos", "images", "gallery", "mediaList"];
const IMAGE_URL_KEYS: [&str; 4] = ["url", "src", "original", "path"];
const PRODUCT_URL_KEYS: [&str; 3] = ["url", "link", "href"];
const PRICE_KEYS: [&str; 3] = ["sellPrice", "price", "fullPrice"];

/// Maps a raw state object into a [`ProductRecord`]
///
/// Returns [`ScrapeError::Normalization`] when the object has a shape the
/// resolvers cannot interpret; callers fall back to markup extraction then.
pub fn normalize(raw: &Value, source_url: &str, config: &ScraperConfig) -> Result<ProductRecord> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ScrapeError::normalization(format!("expected an object, got {}", kind(raw))))?;

    let mut record = ProductRecord::empty(source_url);

    if let Some(name) = resolve_name(obj) {
        record.name = name.to_string();
    }
    if let Some(description) = resolve_description(obj) {
        record.description = description.to_string();
    }
    if let Some(price) = resolve_price(obj)? {
        record.price_display = format!("{} {}", group_thousands(price), config.currency_label);
        record.price_numeric = price;
    }

    let images = resolve_images(obj)?
        .iter()
        .map(|image| normalize_url(image, &config.base_url))
        .collect();
    record.set_images(images);
    record.set_colors(resolve_colors(obj));
    record.availability = resolve_availability(obj)?;

    ::log::info!("Normalized product from client state: {}", record.name);
    Ok(record)
}

/// Returns the first candidate key holding a non-blank string
fn first_string<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

pub fn resolve_name(obj: &Map<String, Value>) -> Option<&str> {
    first_string(obj, &NAME_KEYS)
}

pub fn resolve_description(obj: &Map<String, Value>) -> Option<&str> {
    first_string(obj, &["description"]).or_else(|| {
        obj.get("detail")
            .and_then(Value::as_object)
            .and_then(|detail| first_string(detail, &["description"]))
    })
}

/// Resolves the price to a positive integer
///
/// An object price uses `current`, then `price`. Missing, zero and negative
/// values resolve to `None`; values that are not numbers are an error.
pub fn resolve_price(obj: &Map<String, Value>) -> Result<Option<u64>> {
    let value = match obj.get("price") {
        None => return Ok(None),
        Some(Value::Object(inner)) => inner
            .get("current")
            .filter(|v| is_truthy(v))
            .or_else(|| inner.get("price")),
        Some(scalar) => Some(scalar),
    };

    let amount = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ScrapeError::normalization(format!("unrepresentable price {}", n)))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ScrapeError::normalization(format!("non-numeric price {:?}", s)))?,
        Some(other) => {
            return Err(ScrapeError::normalization(format!(
                "unsupported price of type {}",
                kind(other)
            )));
        }
    };

    if amount > 0.0 {
        Ok(Some(amount.round() as u64))
    } else {
        Ok(None)
    }
}

/// Collects raw image references from the first candidate list that has any
pub fn resolve_images(obj: &Map<String, Value>) -> Result<Vec<String>> {
    for key in IMAGE_LIST_KEYS {
        let Some(Value::Array(entries)) = obj.get(key) else {
            continue;
        };

        let mut images = Vec::new();
        for entry in entries {
            match entry {
                Value::String(s) if !s.trim().is_empty() => images.push(s.trim().to_string()),
                Value::Object(fields) => {
                    if let Some(image) = image_from_object(fields)? {
                        images.push(image);
                    }
                }
                _ => {}
            }
        }

        if !images.is_empty() {
            ::log::debug!("Found {} images under '{}'", images.len(), key);
            return Ok(images);
        }
    }

    Ok(Vec::new())
}

fn image_from_object(fields: &Map<String, Value>) -> Result<Option<String>> {
    let Some((key, value)) = IMAGE_URL_KEYS
        .iter()
        .find_map(|key| fields.get(*key).map(|value| (*key, value)))
    else {
        return Ok(None);
    };

    match value {
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        Value::Null => Ok(None),
        other => Err(ScrapeError::normalization(format!(
            "image '{}' is a {}, not a URL",
            key,
            kind(other)
        ))),
    }
}

/// Colors from a `colors` list of objects; unnamed entries are dropped
pub fn resolve_colors(obj: &Map<String, Value>) -> Vec<Color> {
    let Some(Value::Array(entries)) = obj.get("colors") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|color| {
            let name = color.get("name").and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Color {
                name: name.to_string(),
                id: color.get("id").map(scalar_to_string).unwrap_or_default(),
            })
        })
        .collect()
}

/// Stock status: `availableAmount > 0`, then `inStock`, otherwise available
pub fn resolve_availability(obj: &Map<String, Value>) -> Result<bool> {
    match obj.get("availableAmount") {
        Some(Value::Number(n)) => return Ok(n.as_f64().is_some_and(|amount| amount > 0.0)),
        None | Some(Value::Null) => {}
        Some(other) => {
            return Err(ScrapeError::normalization(format!(
                "availableAmount is a {}",
                kind(other)
            )));
        }
    }

    Ok(obj.get("inStock").and_then(Value::as_bool).unwrap_or(true))
}

/// Builds product links from the objects a listing probe returned
///
/// Only objects that look like products count: they carry a `productId`, a
/// price, a `photos` list or a `/product/` URL. Category menus and breadcrumbs
/// share the `id` + `title` shape and are skipped. An object contributes its
/// own URL when it has one, otherwise a `/product/<productId>` link on the
/// site. Links the filter rejects are skipped.
pub fn product_links(
    raw: &Value,
    page_url: &Url,
    base_url: &str,
    filter: &LinkFilter,
) -> Vec<String> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter(|item| is_product_item(item))
        .filter_map(|item| {
            let href = match product_url(item) {
                Some(url) => normalize_url(url, base_url),
                None => {
                    let id = item.get("productId").map(scalar_to_string)?;
                    if id.is_empty() {
                        return None;
                    }
                    format!("{}/product/{}", base_url.trim_end_matches('/'), id)
                }
            };
            filter.accept(&href, page_url)
        })
        .collect()
}

fn product_url(item: &Map<String, Value>) -> Option<&str> {
    PRODUCT_URL_KEYS
        .iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|url| url.contains("/product/"))
}

fn is_product_item(item: &Map<String, Value>) -> bool {
    item.get("productId").is_some_and(|id| !id.is_null())
        || PRICE_KEYS.iter().any(|key| item.contains_key(*key))
        || item.get("photos").is_some_and(Value::is_array)
        || product_url(item).is_some()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Truthiness as the page scripts see it
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
