//! Tests for the query builder

use super::*;

const FOOTPRINT: &str = "POLYGON((10 50,11 50,11 51,10 51,10 50))";

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn sample_query() -> SearchQuery {
    SearchQuery::builder()
        .platform("SENTINEL-2")
        .product_type("S2MSI2A")
        .cloud_cover_ceiling(30.0)
        .footprint(FOOTPRINT)
        .start_date(date("2023-05-01"))
        .end_date(date("2023-05-31"))
        .build()
        .unwrap()
}

#[test]
fn test_full_expression() {
    let expr = build(&sample_query());

    let expected = "Collection/Name eq 'SENTINEL-2' \
        and Attributes/OData.CSC.StringAttribute/any(att:att/Name eq 'productType' \
        and att/OData.CSC.StringAttribute/Value eq 'S2MSI2A') \
        and Attributes/OData.CSC.DoubleAttribute/any(att:att/Name eq 'cloudCover' \
        and att/OData.CSC.DoubleAttribute/Value lt 30) \
        and OData.CSC.Intersects(area=geography'SRID=4326;POLYGON((10 50,11 50,11 51,10 51,10 50))') \
        and ContentDate/Start gt 2023-05-01T00:00:00.000Z \
        and ContentDate/Start lt 2023-05-31T12:00:00.000Z";
    assert_eq!(expr.as_str(), expected);
}

#[test]
fn test_date_suffixes_are_asymmetric() {
    let expr = build(&sample_query());
    assert!(expr.as_str().contains("2023-05-01T00:00:00.000Z"));
    assert!(expr.as_str().contains("2023-05-31T12:00:00.000Z"));
    assert!(!expr.as_str().contains("2023-05-31T00:00:00.000Z"));
}

#[test]
fn test_fields_do_not_leak_into_each_other() {
    let base = sample_query();
    let changed = SearchQuery::builder()
        .platform("SENTINEL-1")
        .product_type("GRD")
        .cloud_cover_ceiling(75.5)
        .footprint(FOOTPRINT)
        .start_date(date("2023-05-01"))
        .end_date(date("2023-05-31"))
        .build()
        .unwrap();

    let a = build(&base);
    let b = build(&changed);

    // Date clauses are identical regardless of the other fields
    let date_part = |e: &FilterExpression| {
        let s = e.as_str();
        s[s.find("ContentDate").unwrap()..].to_string()
    };
    assert_eq!(date_part(&a), date_part(&b));
    assert!(b.as_str().contains("Value lt 75.5"));
    assert!(b.as_str().contains("Collection/Name eq 'SENTINEL-1'"));
    assert!(b.as_str().contains("Value eq 'GRD'"));
}

#[test]
fn test_end_date_changes_only_end_clause() {
    let a = build(&sample_query());
    let b = build(
        &SearchQuery::builder()
            .platform("SENTINEL-2")
            .product_type("S2MSI2A")
            .cloud_cover_ceiling(30.0)
            .footprint(FOOTPRINT)
            .start_date(date("2023-05-01"))
            .end_date(date("2023-06-15"))
            .build()
            .unwrap(),
    );

    assert!(b.as_str().contains("2023-06-15T12:00:00.000Z"));
    assert_eq!(
        a.as_str().replace("2023-05-31", "2023-06-15"),
        b.as_str()
    );
}

#[test]
fn test_missing_fields_are_reported() {
    let err = SearchQuery::builder()
        .product_type("S2MSI2A")
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("platform"));

    let err = SearchQuery::builder()
        .platform("SENTINEL-2")
        .product_type("S2MSI2A")
        .footprint(FOOTPRINT)
        .cloud_cover_ceiling(10.0)
        .start_date(date("2023-05-01"))
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("end_date"));
}

#[test]
fn test_cloud_cover_out_of_range() {
    let err = SearchQuery::builder()
        .platform("SENTINEL-2")
        .product_type("S2MSI2A")
        .footprint(FOOTPRINT)
        .cloud_cover_ceiling(120.0)
        .start_date(date("2023-05-01"))
        .end_date(date("2023-05-02"))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidField {
            field: "cloud_cover_ceiling",
            ..
        }
    ));
}

#[test]
fn test_inverted_dates_rejected() {
    let err = SearchQuery::builder()
        .platform("SENTINEL-2")
        .product_type("S2MSI2A")
        .footprint(FOOTPRINT)
        .cloud_cover_ceiling(10.0)
        .start_date(date("2023-06-01"))
        .end_date(date("2023-05-01"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvertedDateRange { .. }));
}

#[test]
fn test_same_day_window_is_valid() {
    let query = SearchQuery::builder()
        .platform("SENTINEL-2")
        .product_type("S2MSI2A")
        .footprint(FOOTPRINT)
        .cloud_cover_ceiling(0.0)
        .start_date(date("2023-05-01"))
        .end_date(date("2023-05-01"))
        .build()
        .unwrap();
    let expr = build(&query);
    assert!(expr.as_str().contains("gt 2023-05-01T00:00:00.000Z"));
    assert!(expr.as_str().contains("lt 2023-05-01T12:00:00.000Z"));
}

#[test]
fn test_blank_and_quoted_text_rejected() {
    let err = SearchQuery::builder()
        .platform("   ")
        .build()
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidField { field: "platform", .. }));

    let err = SearchQuery::builder()
        .platform("SENTINEL-2' or 1 eq 1")
        .build()
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidField { field: "platform", .. }));
}

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date(" 2024-02-29 ").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert!(parse_date("2023-02-30").is_err());
    assert!(parse_date("01/05/2023").is_err());
}

#[test]
fn test_to_url_encodes_expression() {
    let expr = build(&sample_query());
    let url = expr
        .to_url("https://catalogue.dataspace.copernicus.eu/odata/v1/Products")
        .unwrap();

    let text = url.as_str();
    assert!(text.starts_with(
        "https://catalogue.dataspace.copernicus.eu/odata/v1/Products?$filter=Collection/Name%20eq%20"
    ));
    assert!(!text.contains(' '));
    assert_eq!(url.query().map(|q| q.starts_with("$filter=")), Some(true));
}

#[test]
fn test_to_url_rejects_bad_endpoint() {
    let expr = build(&sample_query());
    let err = expr.to_url("not a url").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidField { field: "endpoint", .. }));
}
