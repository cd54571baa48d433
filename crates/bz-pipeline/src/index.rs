//! Envelope index over layer features.
//!
//! Candidates come back in feature order so downstream output stays
//! deterministic regardless of tree layout.

use geo::{Point, Rect};
use rstar::{AABB, RTree, RTreeObject};

struct FeatureBox {
    index: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

fn aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// R-tree of feature envelopes keyed by position in the layer.
pub struct EnvelopeIndex {
    tree: RTree<FeatureBox>,
}

impl EnvelopeIndex {
    /// Index envelopes by position; `None` entries are never returned.
    #[must_use]
    pub fn new<'a>(envelopes: impl IntoIterator<Item = Option<&'a Rect<f64>>>) -> Self {
        let boxes = envelopes
            .into_iter()
            .enumerate()
            .filter_map(|(index, rect)| rect.map(|rect| FeatureBox { index, env: aabb(rect) }))
            .collect();
        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// Index single points by position.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> Self {
        let boxes = points
            .into_iter()
            .enumerate()
            .map(|(index, point)| FeatureBox {
                index,
                env: AABB::from_point([point.x(), point.y()]),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// Positions whose envelope touches `rect`, ascending.
    #[must_use]
    pub fn candidates(&self, rect: Option<&Rect<f64>>) -> Vec<usize> {
        let Some(rect) = rect else {
            return Vec::new();
        };
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&aabb(rect))
            .map(|item| item.index)
            .collect();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, point};
    use pretty_assertions::assert_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }

    #[test]
    fn candidates_are_in_feature_order() {
        let rects = [rect(50.0, 0.0, 60.0, 10.0), rect(0.0, 0.0, 5.0, 5.0), rect(4.0, 4.0, 8.0, 8.0)];
        let index = EnvelopeIndex::new([Some(&rects[0]), None, Some(&rects[1]), Some(&rects[2])]);

        assert_eq!(index.candidates(Some(&rect(0.0, 0.0, 10.0, 10.0))), vec![2, 3]);
        assert_eq!(index.candidates(Some(&rect(100.0, 0.0, 110.0, 10.0))), Vec::<usize>::new());
        assert_eq!(index.candidates(None), Vec::<usize>::new());
    }

    #[test]
    fn shared_edge_is_a_candidate() {
        let rects = [rect(10.0, 0.0, 20.0, 10.0)];
        let index = EnvelopeIndex::new([Some(&rects[0])]);
        assert_eq!(index.candidates(Some(&rect(0.0, 0.0, 10.0, 10.0))), vec![0]);
    }

    #[test]
    fn points_are_found_by_zone_envelope() {
        let points = [point!(x: 1.0, y: 1.0), point!(x: 20.0, y: 1.0), point!(x: 9.0, y: 9.0)];
        let index = EnvelopeIndex::from_points(&points);
        assert_eq!(index.candidates(Some(&rect(0.0, 0.0, 10.0, 10.0))), vec![0, 2]);
    }
}
