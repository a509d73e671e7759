//! Query builder: search parameters to a catalog filter expression.
//!
//! The catalog speaks OData. A [`SearchQuery`] is turned into the `$filter`
//! expression by [`build`], which is pure and total: every validation step
//! happens earlier, in [`SearchQueryBuilder::build`].
//!
//! The start date gets a start-of-day suffix and the end date a mid-day
//! suffix. The asymmetry matches how the catalog has always been queried
//! and must not be "fixed".

use std::fmt;

use chrono::NaiveDate;
use reqwest::Url;
use thiserror::Error;

/// Suffix appended to the start date.
pub const START_OF_DAY: &str = "T00:00:00.000Z";

/// Suffix appended to the end date.
pub const END_OF_WINDOW: &str = "T12:00:00.000Z";

/// Reference system of the footprint sent to the catalog.
pub const FOOTPRINT_SRID: u32 = 4326;

/// Default collection name.
pub const DEFAULT_PLATFORM: &str = "SENTINEL-2";

/// Default product type (Level-2A surface reflectance).
pub const DEFAULT_PRODUCT_TYPE: &str = "S2MSI2A";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Invalid or incomplete search parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required parameter was not supplied.
    #[error("missing search parameter: {0}")]
    MissingField(&'static str),

    /// A parameter was supplied with an unusable value.
    #[error("invalid search parameter {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Start date falls after end date.
    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

/// A fully specified catalog search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    platform: String,
    product_type: String,
    cloud_cover_ceiling: f64,
    footprint: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl SearchQuery {
    /// Start building a query.
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Maximum cloud cover in percent (exclusive).
    pub fn cloud_cover_ceiling(&self) -> f64 {
        self.cloud_cover_ceiling
    }

    /// Footprint polygon as WKT, in EPSG:4326.
    pub fn footprint(&self) -> &str {
        &self.footprint
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// Builder for [`SearchQuery`].
///
/// Every field is required; [`build`](Self::build) reports the first one
/// missing.
#[derive(Debug, Clone, Default)]
pub struct SearchQueryBuilder {
    platform: Option<String>,
    product_type: Option<String>,
    cloud_cover_ceiling: Option<f64>,
    footprint: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl SearchQueryBuilder {
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn cloud_cover_ceiling(mut self, percent: f64) -> Self {
        self.cloud_cover_ceiling = Some(percent);
        self
    }

    pub fn footprint(mut self, wkt: impl Into<String>) -> Self {
        self.footprint = Some(wkt.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Validate and produce the query.
    pub fn build(self) -> Result<SearchQuery, ValidationError> {
        let platform = required_text(self.platform, "platform")?;
        let product_type = required_text(self.product_type, "product_type")?;
        let footprint = required_text(self.footprint, "footprint")?;

        let cloud_cover_ceiling = self
            .cloud_cover_ceiling
            .ok_or(ValidationError::MissingField("cloud_cover_ceiling"))?;
        if !(0.0..=100.0).contains(&cloud_cover_ceiling) {
            return Err(ValidationError::InvalidField {
                field: "cloud_cover_ceiling",
                reason: format!("{} is outside 0-100", cloud_cover_ceiling),
            });
        }

        let start_date = self
            .start_date
            .ok_or(ValidationError::MissingField("start_date"))?;
        let end_date = self
            .end_date
            .ok_or(ValidationError::MissingField("end_date"))?;
        if start_date > end_date {
            return Err(ValidationError::InvertedDateRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(SearchQuery {
            platform,
            product_type,
            cloud_cover_ceiling,
            footprint,
            start_date,
            end_date,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if trimmed.contains('\'') {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must not contain quotes".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidField {
            field: "date",
            reason: format!("'{}' is not a YYYY-MM-DD date: {}", text.trim(), e),
        }
    })
}

/// An OData `$filter` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression(String);

impl FilterExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Full request URL for this filter against a catalog `endpoint`.
    ///
    /// Any query string already on the endpoint is replaced. The expression
    /// is percent-encoded (spaces become `%20`), the `$filter` key is not.
    pub fn to_url(&self, endpoint: &str) -> Result<Url, ValidationError> {
        let mut url = Url::parse(endpoint).map_err(|e| ValidationError::InvalidField {
            field: "endpoint",
            reason: format!("'{}': {}", endpoint, e),
        })?;
        url.set_query(Some(&format!("$filter={}", self.0)));
        Ok(url)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the catalog filter for `query`.
pub fn build(query: &SearchQuery) -> FilterExpression {
    let clauses = [
        format!("Collection/Name eq '{}'", query.platform),
        format!(
            "Attributes/OData.CSC.StringAttribute/any(att:att/Name eq 'productType' \
             and att/OData.CSC.StringAttribute/Value eq '{}')",
            query.product_type
        ),
        format!(
            "Attributes/OData.CSC.DoubleAttribute/any(att:att/Name eq 'cloudCover' \
             and att/OData.CSC.DoubleAttribute/Value lt {})",
            query.cloud_cover_ceiling
        ),
        format!(
            "OData.CSC.Intersects(area=geography'SRID={};{}')",
            FOOTPRINT_SRID, query.footprint
        ),
        format!(
            "ContentDate/Start gt {}{}",
            query.start_date.format(DATE_FORMAT),
            START_OF_DAY
        ),
        format!(
            "ContentDate/Start lt {}{}",
            query.end_date.format(DATE_FORMAT),
            END_OF_WINDOW
        ),
    ];
    FilterExpression(clauses.join(" and "))
}

#[cfg(test)]
mod tests;
