//! Catalog response model and product path handling.

use serde::Deserialize;

/// Character offset of the tile code inside a product name.
pub const TILE_CODE_OFFSET: usize = 39;

/// Length of the tile code in characters.
pub const TILE_CODE_LEN: usize = 5;

/// One entry of the catalog's `value` array.
///
/// Only the fields the resolver needs are decoded; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogProduct {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "S3Path")]
    pub s3_path: String,
}

impl CatalogProduct {
    /// Tile code encoded in the product name, see [`tile_code`].
    pub fn tile_code(&self) -> Option<&str> {
        tile_code(&self.name)
    }
}

/// Top-level catalog response.
///
/// A response without a `value` array decodes as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub value: Vec<CatalogProduct>,
}

/// Extract the tile code from a product name.
///
/// The code is the five characters starting at offset 39, e.g. `32TQM` in
/// `S2A_MSIL2A_20230501T101601_N0509_R065_T32TQM_20230501T152318.SAFE`.
/// Names too short to hold a full code yield `None`.
pub fn tile_code(name: &str) -> Option<&str> {
    let mut indices = name.char_indices().map(|(i, _)| i).chain(Some(name.len()));
    let start = indices.nth(TILE_CODE_OFFSET)?;
    let end = indices.nth(TILE_CODE_LEN - 1)?;
    name.get(start..end)
}

/// Whether a tile code refers to `tile`.
///
/// Grid identifiers shorter than the code are compared against the code with
/// its trailing padding (`_` or whitespace) removed.
pub fn code_matches(code: &str, tile: &str) -> bool {
    code == tile || code.trim_end_matches(|c: char| c == '_' || c.is_whitespace()) == tile
}

/// A matched catalog path resolved against the object store bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPath {
    catalog_path: String,
    key: String,
}

impl ProductPath {
    /// Resolve a catalog `S3Path` against `bucket`.
    ///
    /// `/eodata/Sentinel-2/MSI/L2A/2023/05/01/X.SAFE` with bucket `eodata`
    /// becomes the key `Sentinel-2/MSI/L2A/2023/05/01/X.SAFE`. Paths outside
    /// the bucket only lose their leading slash.
    pub fn from_catalog(catalog_path: impl Into<String>, bucket: &str) -> Self {
        let catalog_path = catalog_path.into();
        let bucket_prefix = format!("/{}/", bucket);
        let key = catalog_path
            .strip_prefix(&bucket_prefix)
            .unwrap_or_else(|| catalog_path.trim_start_matches('/'))
            .trim_end_matches('/')
            .to_string();
        Self { catalog_path, key }
    }

    /// The path exactly as the catalog returned it.
    pub fn catalog_path(&self) -> &str {
        &self.catalog_path
    }

    /// Object key inside the bucket, no leading or trailing slash.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Product name: the last segment of the key.
    pub fn name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Key of the directory holding the product, empty at bucket root.
    pub fn parent(&self) -> &str {
        self.key.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
    }
}

impl std::fmt::Display for ProductPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "S2A_MSIL2A_20230501T101601_N0509_R065_T32TQM_20230501T152318.SAFE";

    #[test]
    fn test_tile_code_offset() {
        assert_eq!(tile_code(NAME), Some("32TQM"));
    }

    #[test]
    fn test_tile_code_short_name() {
        assert_eq!(tile_code("S2A_MSIL2A"), None);
        assert_eq!(tile_code(&"x".repeat(43)), None);
        assert_eq!(tile_code(&"x".repeat(44)), Some("xxxxx"));
    }

    #[test]
    fn test_tile_code_counts_characters() {
        // Multi-byte prefix must not shift the offset
        let name = format!("{}ABCDE", "é".repeat(39));
        assert_eq!(tile_code(&name), Some("ABCDE"));
    }

    #[test]
    fn test_code_matches_padding() {
        assert!(code_matches("32TQM", "32TQM"));
        assert!(code_matches("T1___", "T1"));
        assert!(code_matches("T1   ", "T1"));
        assert!(!code_matches("T12__", "T1"));
        assert!(!code_matches("32TQM", "32TQN"));
    }

    #[test]
    fn test_product_path_strips_bucket() {
        let path = ProductPath::from_catalog("/bucket/A/B/C", "bucket");
        assert_eq!(path.key(), "A/B/C");
        assert_eq!(path.name(), "C");
        assert_eq!(path.parent(), "A/B");
        assert_eq!(path.catalog_path(), "/bucket/A/B/C");
    }

    #[test]
    fn test_product_path_foreign_prefix() {
        let path = ProductPath::from_catalog("/other/A/B.SAFE/", "eodata");
        assert_eq!(path.key(), "other/A/B.SAFE");
        assert_eq!(path.name(), "B.SAFE");
    }

    #[test]
    fn test_product_path_at_root() {
        let path = ProductPath::from_catalog("/eodata/X.SAFE", "eodata");
        assert_eq!(path.key(), "X.SAFE");
        assert_eq!(path.parent(), "");
    }

    #[test]
    fn test_response_decoding() {
        let json = format!(
            r#"{{"@odata.context":"$metadata#Products","value":[{{"Id":"1","Name":"{}","S3Path":"/eodata/a/b"}}]}}"#,
            NAME
        );
        let response: CatalogResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.value.len(), 1);
        assert_eq!(response.value[0].tile_code(), Some("32TQM"));
        assert_eq!(response.value[0].s3_path, "/eodata/a/b");
    }

    #[test]
    fn test_response_without_value_is_empty() {
        let response: CatalogResponse = serde_json::from_str(r#"{"detail":"nothing"}"#).unwrap();
        assert!(response.value.is_empty());
    }
}
