//! Suburb boundary feature collections.

use std::collections::BTreeSet;
use std::path::Path;

use geo::{Contains as _, MultiPolygon, Point};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;
use sydney_property_analytics::filters::normalize_suburb_name;

use crate::GeographyError;

/// Property keys that may hold a feature's suburb name, in lookup order.
const SUBURB_NAME_KEYS: [&str; 2] = ["suburb", "suburbname"];

/// Extracts the normalized suburb name from a feature's properties.
///
/// Keys are matched case-insensitively. Missing, non-string or blank values
/// yield `None`.
#[must_use]
pub fn suburb_name_from_feature(feature: &Feature) -> Option<String> {
    let properties = feature.properties.as_ref()?;

    SUBURB_NAME_KEYS.iter().find_map(|wanted| {
        let (_, value) = properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))?;
        match value {
            Value::String(name) if !name.trim().is_empty() => Some(normalize_suburb_name(name)),
            _ => None,
        }
    })
}

fn to_multipolygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// A loaded set of suburb boundaries.
#[derive(Debug, Clone)]
pub struct SuburbBoundaries {
    collection: FeatureCollection,
    shapes: Vec<(String, MultiPolygon<f64>)>,
}

impl SuburbBoundaries {
    /// Builds boundaries from a feature collection. Features without a
    /// suburb name or a polygonal geometry are kept in the collection but
    /// cannot be resolved by [`Self::suburb_at`].
    #[must_use]
    pub fn new(collection: FeatureCollection) -> Self {
        let shapes = collection
            .features
            .iter()
            .filter_map(|f| Some((suburb_name_from_feature(f)?, to_multipolygon(f)?)))
            .collect();

        Self { collection, shapes }
    }

    /// Parses a `GeoJSON` document that must be a feature collection.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the text is not valid `GeoJSON` or is
    /// not a `FeatureCollection`.
    pub fn parse(text: &str) -> Result<Self, GeographyError> {
        match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Self::new(collection)),
            GeoJson::Geometry(_) | GeoJson::Feature(_) => Err(GeographyError::Conversion {
                message: "expected a FeatureCollection".to_string(),
            }),
        }
    }

    /// Reads and parses a boundary file.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GeographyError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let boundaries = Self::parse(&text)?;
        log::info!(
            "Loaded {} suburb boundaries from {}",
            boundaries.len(),
            path.display()
        );
        Ok(boundaries)
    }

    /// Downloads and parses a boundary document.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the request fails, returns a non-2xx
    /// status, or the body cannot be parsed.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, GeographyError> {
        log::debug!("Fetching suburb boundaries from {url}");
        let text = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::parse(&text)
    }

    /// All features, including those without a usable name.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// Distinct normalized suburb names across all features.
    #[must_use]
    pub fn suburb_names(&self) -> BTreeSet<String> {
        self.collection
            .features
            .iter()
            .filter_map(suburb_name_from_feature)
            .collect()
    }

    /// Returns the suburb whose boundary contains the point.
    #[must_use]
    pub fn suburb_at(&self, longitude: f64, latitude: f64) -> Option<&str> {
        let point = Point::new(longitude, latitude);
        self.shapes
            .iter()
            .find(|(_, shape)| shape.contains(&point))
            .map(|(name, _)| name.as_str())
    }
}
