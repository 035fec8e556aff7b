//! Product representation exchanged with the load and save collaborators.
//!
//! Only the media fields are interpreted here. Everything else the product API
//! sends (name, SKU, category, pricing, sizes, inventory, status...) is kept in
//! the `extra` maps and written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as the catalog API shapes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Main image identifier (the API uses an empty string for none)
    #[serde(default, with = "empty_as_none")]
    pub image: Option<String>,

    /// Gallery image identifiers, in display order
    #[serde(default)]
    pub images: Vec<String>,

    /// Color and size variants
    #[serde(default)]
    pub variants: ProductVariants,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `variants` object of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductVariants {
    #[serde(default)]
    pub colors: Vec<ColorVariant>,

    #[serde(default)]
    pub sizes: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One color variant and its images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default = "default_hex")]
    pub hex: String,

    #[serde(default = "default_available")]
    pub available: bool,

    /// Image identifiers of this color, in display order
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_hex() -> String {
    "#000000".to_string()
}

fn default_available() -> bool {
    true
}

impl Default for ColorVariant {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            hex: default_hex(),
            available: default_available(),
            images: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl ColorVariant {
    /// Create a color with a slug derived from its name.
    pub fn new(name: &str, hex: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            hex: hex.to_string(),
            ..Default::default()
        }
    }
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl ProductRecord {
    /// Deserialize a product from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the product to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Product name, when the record carries one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    /// Every media identifier the record references.
    pub fn media_ids(&self) -> impl Iterator<Item = &str> {
        self.image
            .as_deref()
            .into_iter()
            .chain(self.images.iter().map(String::as_str))
            .chain(
                self.variants
                    .colors
                    .iter()
                    .flat_map(|c| c.images.iter().map(String::as_str)),
            )
    }
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "name": "Linen Shirt",
        "sku": "LS-001",
        "pricing": { "original": 450000, "sale": 390000, "currency": "VND" },
        "image": "/uploads/products/main.jpg",
        "images": ["/uploads/products/g1.jpg", "/uploads/products/g2.jpg"],
        "variants": {
            "colors": [
                { "name": "White", "slug": "white", "hex": "#ffffff", "available": true,
                  "images": ["/uploads/products/w1.jpg"] },
                { "name": "Navy", "slug": "navy", "hex": "#000080", "available": false }
            ],
            "sizes": [{ "name": "M", "available": true, "stock": 4 }]
        },
        "status": "active"
    }"##;

    #[test]
    fn test_parse_media_fields() {
        let record = ProductRecord::from_json(SAMPLE).unwrap();
        assert_eq!(record.image.as_deref(), Some("/uploads/products/main.jpg"));
        assert_eq!(record.images.len(), 2);
        assert_eq!(record.variants.colors.len(), 2);
        assert_eq!(record.variants.colors[0].images, vec!["/uploads/products/w1.jpg"]);
        assert!(record.variants.colors[1].images.is_empty());
        assert_eq!(record.name(), Some("Linen Shirt"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let record = ProductRecord::from_json(SAMPLE).unwrap();
        let json = record.to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sku"], "LS-001");
        assert_eq!(value["pricing"]["sale"], 390000);
        assert_eq!(value["variants"]["sizes"][0]["stock"], 4);
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_empty_image_is_none() {
        let record = ProductRecord::from_json(r#"{ "image": "", "images": [] }"#).unwrap();
        assert!(record.image.is_none());

        let json = record.to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["image"], "");
    }

    #[test]
    fn test_media_ids_in_order() {
        let record = ProductRecord::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = record.media_ids().collect();
        assert_eq!(
            ids,
            vec![
                "/uploads/products/main.jpg",
                "/uploads/products/g1.jpg",
                "/uploads/products/g2.jpg",
                "/uploads/products/w1.jpg",
            ]
        );
    }

    #[test]
    fn test_color_slug() {
        let color = ColorVariant::new("Dusty Rose", "#dcae96");
        assert_eq!(color.slug, "dusty-rose");
        assert!(color.available);
        assert!(color.images.is_empty());
    }
}
