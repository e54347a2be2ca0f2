//! KML `<coordinates>` extraction.
//!
//! Only the coordinate lists matter for playback, so the document is scanned
//! for `<coordinates>...</coordinates>` spans instead of being parsed as XML.
//! Every span becomes one [`LineFeature`]; parsing is tolerant: bad triples
//! are dropped and an unterminated span ends the scan.

use crate::{round_significant, BoundingBox, Coordinate, GeoError, Result, COORDINATE_PRECISION};
use serde::{Deserialize, Serialize};

/// Marker opening a coordinate list.
pub const OPEN_TAG: &str = "<coordinates>";

/// Marker closing a coordinate list.
pub const CLOSE_TAG: &str = "</coordinates>";

/// One continuous path. Order is travel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineFeature {
    pub coordinates: Vec<Coordinate>,
}

impl LineFeature {
    /// Creates a feature from coordinates in travel order.
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// True if the feature holds no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// True if the feature cannot describe a path (fewer than 2 coordinates).
    pub fn is_degenerate(&self) -> bool {
        self.coordinates.len() < 2
    }

    /// Bounding box of the feature, `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(&self.coordinates)
    }
}

/// Parsed route description: every line feature in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    pub features: Vec<LineFeature>,
    /// Scanning stopped at a start marker that was never closed
    #[serde(default)]
    pub truncated: bool,
    /// Triples dropped because a token was not numeric or out of range
    #[serde(default)]
    pub skipped_triples: usize,
}

impl RouteDocument {
    /// The feature playback operates on.
    pub fn first_feature(&self) -> Option<&LineFeature> {
        self.features.first()
    }

    /// Total number of coordinates across all features.
    pub fn coordinate_count(&self) -> usize {
        self.features.iter().map(LineFeature::len).sum()
    }
}

/// Tolerant `<coordinates>` scanner.
#[derive(Debug, Clone, Copy)]
pub struct KmlParser {
    precision: usize,
}

impl Default for KmlParser {
    fn default() -> Self {
        Self {
            precision: COORDINATE_PRECISION,
        }
    }
}

impl KmlParser {
    /// Parser normalizing to [`COORDINATE_PRECISION`] significant digits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser normalizing to `precision` significant digits.
    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    /// Parses every coordinate span, stopping quietly at an unterminated one.
    pub fn parse(&self, text: &str) -> RouteDocument {
        self.scan(text).0
    }

    /// Like [`KmlParser::parse`], but an unterminated span is an error.
    pub fn parse_strict(&self, text: &str) -> Result<RouteDocument> {
        match self.scan(text) {
            (_, Some(offset)) => Err(GeoError::UnterminatedSpan { offset }),
            (doc, None) => Ok(doc),
        }
    }

    /// Returns the document and, if scanning hit an unterminated span, the
    /// byte offset of its start marker.
    fn scan(&self, text: &str) -> (RouteDocument, Option<usize>) {
        let mut doc = RouteDocument::default();
        let mut cursor = 0;

        while cursor < text.len() {
            let Some(found) = text[cursor..].find(OPEN_TAG) else {
                break;
            };
            let open_at = cursor + found;
            let body_start = open_at + OPEN_TAG.len();

            let Some(found) = text[body_start..].find(CLOSE_TAG) else {
                tracing::warn!(offset = open_at, "unterminated <coordinates> span, discarding it");
                doc.truncated = true;
                return (doc, Some(open_at));
            };
            let body_end = body_start + found;

            let (feature, skipped) = self.parse_feature(&text[body_start..body_end]);
            doc.skipped_triples += skipped;
            doc.features.push(feature);

            // resume from the end marker; it always lies past the start marker
            cursor = body_end;
        }

        tracing::debug!(
            features = doc.features.len(),
            skipped = doc.skipped_triples,
            "parsed route document"
        );
        (doc, None)
    }

    /// Parses one span body into a feature, returning the number of dropped triples.
    fn parse_feature(&self, body: &str) -> (LineFeature, usize) {
        let tokens: Vec<&str> = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();

        let mut coordinates = Vec::with_capacity(tokens.len() / 3);
        let mut skipped = 0;

        // chunks_exact leaves an incomplete trailing run out
        for triple in tokens.chunks_exact(3) {
            match self.parse_triple(triple) {
                Some(coord) => coordinates.push(coord),
                None => {
                    tracing::debug!(triple = ?triple, "skipping malformed coordinate triple");
                    skipped += 1;
                }
            }
        }

        (LineFeature::new(coordinates), skipped)
    }

    fn parse_triple(&self, triple: &[&str]) -> Option<Coordinate> {
        let mut values = [0.0_f64; 3];
        for (slot, token) in values.iter_mut().zip(triple) {
            let value: f64 = token.trim().parse().ok()?;
            if !value.is_finite() {
                return None;
            }
            *slot = round_significant(value, self.precision);
        }

        let [lon, lat, alt] = values;
        let coord = Coordinate::new(lon, lat).with_altitude(alt);
        coord.is_valid().then_some(coord)
    }
}

/// Parses a route with the default precision. See [`KmlParser::parse`].
pub fn parse_route(text: &str) -> RouteDocument {
    KmlParser::new().parse(text)
}

/// Parses a route with the default precision. See [`KmlParser::parse_strict`].
pub fn parse_route_strict(text: &str) -> Result<RouteDocument> {
    KmlParser::new().parse_strict(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(body: &str) -> String {
        format!("{OPEN_TAG}{body}{CLOSE_TAG}")
    }

    #[test]
    fn test_single_span_two_coordinates() {
        let doc = parse_route("<coordinates>-92.1,44.0,0 -92.11,44.01,0</coordinates>");
        assert_eq!(doc.features.len(), 1);
        assert_eq!(
            doc.features[0].coordinates,
            vec![
                Coordinate::new(-92.1, 44.0).with_altitude(0.0),
                Coordinate::new(-92.11, 44.01).with_altitude(0.0),
            ]
        );
        assert!(!doc.truncated);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_route("");
        assert!(doc.features.is_empty());
        assert!(!doc.truncated);
        assert!(parse_route_strict("").unwrap().features.is_empty());
    }

    #[test]
    fn test_no_coordinates_in_document() {
        let doc = parse_route("<kml><Document><name>Red</name></Document></kml>");
        assert!(doc.features.is_empty());
    }

    #[test]
    fn test_bad_token_drops_its_triple_only() {
        let doc = parse_route(&span("1,2,3,x,y,z,4,5,6"));
        assert_eq!(
            doc.features[0].coordinates,
            vec![
                Coordinate::new(1.0, 2.0).with_altitude(3.0),
                Coordinate::new(4.0, 5.0).with_altitude(6.0),
            ]
        );
        assert_eq!(doc.skipped_triples, 1);
    }

    #[test]
    fn test_partially_bad_triple_is_dropped() {
        let doc = parse_route(&span("1,2,3 4,oops,6 7,8,9"));
        let lons: Vec<f64> = doc.features[0].coordinates.iter().map(|c| c.longitude).collect();
        assert_eq!(lons, vec![1.0, 7.0]);
    }

    #[test]
    fn test_trailing_incomplete_triple_is_discarded() {
        let doc = parse_route(&span("1,2,3,4,5"));
        assert_eq!(doc.features[0].len(), 1);
        assert_eq!(doc.skipped_triples, 0);
    }

    #[test]
    fn test_out_of_range_triple_is_dropped() {
        let doc = parse_route(&span("181,0,0 10,91,0 10,10,0"));
        assert_eq!(
            doc.features[0].coordinates,
            vec![Coordinate::new(10.0, 10.0).with_altitude(0.0)]
        );
        assert_eq!(doc.skipped_triples, 2);
    }

    #[test]
    fn test_whitespace_and_newlines_between_tuples() {
        let text = "<LineString>\n  <coordinates>\n    -92.1,44.0,0\n    -92.11, 44.01, 0\n\t-92.12,44.02,5\n  </coordinates>\n</LineString>";
        let doc = parse_route(text);
        assert_eq!(doc.features[0].len(), 3);
        assert_eq!(doc.features[0].coordinates[2].altitude, Some(5.0));
    }

    #[test]
    fn test_rounds_to_eight_significant_digits() {
        let doc = parse_route(&span("-92.4659441234,44.02163987654,0.123456789"));
        let coord = doc.features[0].coordinates[0];
        assert_eq!(coord.longitude, -92.465944);
        assert_eq!(coord.latitude, 44.021640);
        assert_eq!(coord.altitude, Some(0.12345679));
    }

    #[test]
    fn test_custom_precision() {
        let doc = KmlParser::with_precision(4).parse(&span("-92.4659,44.0216,0"));
        assert_eq!(doc.features[0].coordinates[0].longitude, -92.47);
        assert_eq!(doc.features[0].coordinates[0].latitude, 44.02);
    }

    #[test]
    fn test_spans_preserved_in_order() {
        let spans: String = (0..4)
            .map(|i| span(&format!("{i},1,0 {i},2,0 {i},3,0")))
            .collect::<Vec<_>>()
            .join("\n<Placemark/>\n");
        let doc = parse_route(&spans);
        assert_eq!(doc.features.len(), 4);
        for (i, feature) in doc.features.iter().enumerate() {
            assert_eq!(feature.len(), 3);
            assert!(feature.coordinates.iter().all(|c| c.longitude == i as f64));
        }
    }

    #[test]
    fn test_back_to_back_spans() {
        let text = format!("{}{}", span("1,2,3"), span("4,5,6"));
        let doc = parse_route(&text);
        assert_eq!(doc.features.len(), 2);
    }

    #[test]
    fn test_nested_start_marker_still_progresses() {
        let doc = parse_route("<coordinates>1,2,3<coordinates>4,5,6</coordinates>");
        assert_eq!(doc.features.len(), 1);
        assert!(!doc.truncated);
    }

    #[test]
    fn test_degenerate_feature_is_kept() {
        let doc = parse_route(&span("1,2,3"));
        assert_eq!(doc.features.len(), 1);
        assert!(doc.features[0].is_degenerate());
    }

    #[test]
    fn test_unterminated_span_truncates() {
        let text = format!("{}{}", span("1,2,3 4,5,6"), "<coordinates>7,8,9");
        let doc = parse_route(&text);
        assert_eq!(doc.features.len(), 1);
        assert!(doc.truncated);

        match parse_route_strict(&text) {
            Err(GeoError::UnterminatedSpan { offset }) => {
                assert_eq!(offset, span("1,2,3 4,5,6").len());
            }
            other => panic!("expected unterminated span, got {:?}", other),
        }
    }

    #[test]
    fn test_case_sensitive_markers() {
        let doc = parse_route("<Coordinates>1,2,3</Coordinates>");
        assert!(doc.features.is_empty());
    }

    #[test]
    fn test_bounds_and_counts() {
        let doc = parse_route(&format!("{}{}", span("1,2,0 3,4,0"), span("5,6,0")));
        assert_eq!(doc.coordinate_count(), 3);
        let bounds = doc.first_feature().unwrap().bounds().unwrap();
        assert_eq!(bounds.min_longitude, 1.0);
        assert_eq!(bounds.max_latitude, 4.0);
    }
}
