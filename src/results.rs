use serde::Serialize;

/// Delimiter used for the joined image and color strings
pub const LIST_DELIMITER: &str = ",";

pub const NAME_NOT_FOUND: &str = "Название не найдено";
pub const DESCRIPTION_MISSING: &str = "Описание отсутствует";
pub const PRICE_MISSING: &str = "Цена не указана";

/// A selectable color variant of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    pub name: String,
    pub id: String,
}

/// Canonical product record produced by every extraction path
///
/// `images_joined` and `colors_joined` are kept in sync by the mutators, so the
/// lists themselves are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,

    pub description: String,

    /// Human readable price
    #[serde(rename = "price")]
    pub price_display: String,

    /// Integer price, `0` when unknown
    #[serde(rename = "price_raw")]
    pub price_numeric: u64,

    images: Vec<String>,

    #[serde(rename = "images_str")]
    images_joined: String,

    colors: Vec<Color>,

    #[serde(rename = "colors_str")]
    colors_joined: String,

    pub availability: bool,

    /// Page the record was extracted from
    #[serde(rename = "url")]
    pub source_url: String,

    /// Identifier taken from the `/product/<id>` path segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl ProductRecord {
    /// Record with every field at its sentinel or default value
    pub fn empty(source_url: &str) -> Self {
        Self {
            name: NAME_NOT_FOUND.to_string(),
            description: DESCRIPTION_MISSING.to_string(),
            price_display: PRICE_MISSING.to_string(),
            price_numeric: 0,
            images: Vec::new(),
            images_joined: String::new(),
            colors: Vec::new(),
            colors_joined: String::new(),
            availability: true,
            source_url: source_url.to_string(),
            product_id: product_id_from_url(source_url),
        }
    }

    /// True when nothing was extracted beyond the source URL
    pub fn is_empty(&self) -> bool {
        self.name == NAME_NOT_FOUND
            && self.description == DESCRIPTION_MISSING
            && self.price_display == PRICE_MISSING
            && self.price_numeric == 0
            && self.images.is_empty()
            && self.colors.is_empty()
            && self.availability
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn images_joined(&self) -> &str {
        &self.images_joined
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn colors_joined(&self) -> &str {
        &self.colors_joined
    }

    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
        self.images_joined = self.images.join(LIST_DELIMITER);
    }

    /// Replaces the colors, dropping entries without a name
    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = colors.into_iter().filter(|c| !c.name.is_empty()).collect();
        self.colors_joined = join_color_names(&self.colors);
    }
}

fn join_color_names(colors: &[Color]) -> String {
    colors
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}

/// Extracts the segment after `/product/`, without query or fragment
pub fn product_id_from_url(url: &str) -> Option<String> {
    let mut parts = url.split('/');
    parts.find(|part| *part == "product")?;
    let id = parts.next()?.split(['?', '#']).next()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Identity of the product a link points at, independent of the link form
///
/// `/ru/product/desk-3` and `/product/3` both give `"3"`. A slug without a
/// numeric tail is its own key. `None` for links that are not product pages.
pub fn product_key(url: &str) -> Option<String> {
    let slug = product_id_from_url(url)?;
    let tail = slug.rsplit('-').next().unwrap_or(&slug);
    if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
        Some(tail.to_string())
    } else {
        Some(slug)
    }
}
