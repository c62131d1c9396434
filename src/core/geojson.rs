use serde_json::Value;
use tracing::debug;

use crate::core::{MapTransforms, PathSegment, ShapeDataset, ShapeRecord};
use crate::error::{ChartError, ChartResult};

/// Converts a GeoJSON `FeatureCollection` with plane coordinates into shapes.
///
/// `Polygon` and `MultiPolygon` rings become `Move, Line.., Close` runs;
/// other geometry types are skipped. Feature `properties` are kept and an
/// `"hc-transform"` member becomes the dataset transforms.
pub fn shapes_from_geojson(collection: &Value) -> ChartResult<ShapeDataset> {
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ChartError::InvalidData("feature collection must carry a `features` array".to_owned())
        })?;

    let mut shapes = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            debug!(index = i, "skipping feature without geometry");
            continue;
        };
        let coordinates = geometry.get("coordinates").unwrap_or(&Value::Null);
        let path = match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => polygon_path(coordinates)?,
            Some("MultiPolygon") => {
                let mut path = Vec::new();
                for polygon in coordinates.as_array().into_iter().flatten() {
                    path.extend(polygon_path(polygon)?);
                }
                path
            }
            other => {
                debug!(index = i, geometry_type = ?other, "skipping non-area feature");
                continue;
            }
        };

        let mut record = ShapeRecord::new(path);
        if let Some(Value::Object(properties)) = feature.get("properties") {
            record.properties = properties.clone();
        }
        if let Some(id) = feature.get("id") {
            record.fields.insert("id".to_owned(), id.clone());
        }
        shapes.push(record);
    }

    let transforms = collection
        .get("hc-transform")
        .map(|transforms| {
            serde_json::from_value::<MapTransforms>(transforms.clone())
                .map_err(|e| ChartError::InvalidData(format!("invalid hc-transform: {e}")))
        })
        .transpose()?;

    Ok(ShapeDataset { shapes, transforms })
}

fn polygon_path(rings: &Value) -> ChartResult<Vec<PathSegment>> {
    let rings = rings
        .as_array()
        .ok_or_else(|| ChartError::InvalidData("polygon coordinates must be an array".to_owned()))?;

    let mut path = Vec::new();
    for ring in rings {
        let mut first = true;
        for position in ring.as_array().into_iter().flatten() {
            let (Some(x), Some(y)) = (
                position.get(0).and_then(Value::as_f64),
                position.get(1).and_then(Value::as_f64),
            ) else {
                continue;
            };
            path.push(if first {
                PathSegment::Move { x, y }
            } else {
                PathSegment::Line { x, y }
            });
            first = false;
        }
        if !first {
            path.push(PathSegment::Close);
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multipolygon_rings_become_closed_subpaths() {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "shape-key": "a" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[0, 0], [1, 0], [1, 1]]],
                            [[[5, 5], [6, 5], [6, 6]]]
                        ]
                    }
                },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1, 2] } }
            ]
        });

        let dataset = shapes_from_geojson(&collection).expect("dataset");
        assert_eq!(dataset.len(), 1);
        let path = &dataset.shapes[0].path;
        assert_eq!(path.len(), 8);
        assert_eq!(path[3], PathSegment::Close);
        assert_eq!(path[4], PathSegment::Move { x: 5.0, y: 5.0 });
        assert_eq!(dataset.shapes[0].lookup("shape-key"), Some(&json!("a")));
    }
}
