//! Vertex editing of polygon and plane outlines.
//!
//! The functions here are pure path transformations. Applying the result to
//! the board goes through [`OutlineEditCommand`](crate::commands::OutlineEditCommand).

use crate::geometry::{Path, Vertex, point_to_segment_dist, snap_to_grid};
use crate::items::{BoardItem, ItemId};
use kurbo::Point;
use std::collections::HashSet;

/// An item whose outline can be edited vertex by vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineTarget {
    Polygon(ItemId),
    Plane(ItemId),
}

impl OutlineTarget {
    pub fn item_id(self) -> ItemId {
        match self {
            OutlineTarget::Polygon(id) | OutlineTarget::Plane(id) => id,
        }
    }

    /// The outline target for polygons and planes, `None` for other items.
    pub fn for_item(item: &BoardItem) -> Option<Self> {
        match item {
            BoardItem::Polygon(p) => Some(OutlineTarget::Polygon(p.id)),
            BoardItem::Plane(p) => Some(OutlineTarget::Plane(p.id)),
            _ => None,
        }
    }
}

/// Insert a grid-snapped vertex before `index`, inheriting the arc angle of the
/// preceding vertex.
///
/// Returns `None` if `index` is 0 or past the end.
pub fn insert_vertex(path: &Path, index: usize, pos: Point, grid_interval: f64) -> Option<Path> {
    if index == 0 || index > path.len() {
        return None;
    }
    let angle = path.vertices()[index - 1].angle;
    let mut result = path.clone();
    result.insert(index, Vertex::new(snap_to_grid(pos, grid_interval), angle));
    Some(result)
}

/// Remove the vertices at `indices`.
///
/// A closed outline stays closed as long as more than two vertices remain; a
/// closed result that would degenerate to three vertices (A, B, A) becomes the
/// open line A, B. Returns `None` when fewer than two vertices would remain.
pub fn remove_vertices(path: &Path, indices: &[usize]) -> Option<Path> {
    let removed: HashSet<usize> = indices.iter().copied().collect();
    let mut result = Path::from_vertices(
        path.vertices()
            .iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, v)| *v)
            .collect(),
    );
    if path.is_closed() && result.len() > 2 {
        result.close();
    }
    if result.is_closed() && result.len() == 3 {
        result.remove_last();
    }
    if result.len() < 2 {
        return None;
    }
    Some(result)
}

/// Indices of all vertices within `radius` of `point`.
///
/// For closed outlines the first and last vertex coincide, so both are
/// returned together and move as one.
pub fn vertex_indices_at(path: &Path, point: Point, radius: f64) -> Vec<usize> {
    path.vertices()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.pos.distance(point) <= radius)
        .map(|(i, _)| i)
        .collect()
}

/// Index of the end vertex of the first segment passing within `tolerance`.
pub fn line_index_at(path: &Path, point: Point, tolerance: f64) -> Option<usize> {
    let vertices = path.vertices();
    (1..vertices.len())
        .find(|&i| point_to_segment_dist(point, vertices[i - 1].pos, vertices[i].pos) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Angle;
    use kurbo::Rect;

    fn square() -> Path {
        Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_remove_keeps_closed_outline_closed() {
        let result = remove_vertices(&square(), &[0]).unwrap();
        assert!(result.is_closed());
        assert_eq!(result.len(), 5);
        assert_eq!(result.vertices()[0].pos, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_remove_degenerate_closed_becomes_open_line() {
        let result = remove_vertices(&square(), &[1, 2]).unwrap();
        assert!(!result.is_closed());
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.points().collect::<Vec<_>>(),
            vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0)]
        );
    }

    #[test]
    fn test_remove_too_many_is_noop() {
        assert!(remove_vertices(&square(), &[0, 1, 2, 3]).is_none());
        let open = Path::from_points([Point::ZERO, Point::new(1.0, 0.0)]);
        assert!(remove_vertices(&open, &[1]).is_none());
    }

    #[test]
    fn test_remove_never_yields_closed_triangle_of_three() {
        let path = square();
        for a in 0..path.len() {
            for b in a..path.len() {
                if let Some(result) = remove_vertices(&path, &[a, b]) {
                    assert!(result.len() >= 2);
                    assert!(!(result.is_closed() && result.len() == 3));
                }
            }
        }
    }

    #[test]
    fn test_insert_vertex_snaps_and_copies_angle() {
        let path = Path::from_vertices(vec![
            Vertex::new(Point::ZERO, Angle::deg90()),
            Vertex::straight(Point::new(10.0, 0.0)),
        ]);
        let result = insert_vertex(&path, 1, Point::new(4.9, 0.2), 2.5).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.vertices()[1].pos, Point::new(5.0, 0.0));
        assert_eq!(result.vertices()[1].angle, Angle::deg90());
    }

    #[test]
    fn test_insert_vertex_rejects_index_zero() {
        assert!(insert_vertex(&square(), 0, Point::ZERO, 1.0).is_none());
        assert!(insert_vertex(&square(), 6, Point::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_vertex_indices_at_closing_vertex() {
        let indices = vertex_indices_at(&square(), Point::new(0.1, 0.0), 0.5);
        assert_eq!(indices, vec![0, 4]);
    }

    #[test]
    fn test_line_index_at() {
        let path = square();
        assert_eq!(line_index_at(&path, Point::new(5.0, 0.1), 0.2), Some(1));
        assert_eq!(line_index_at(&path, Point::new(10.1, 5.0), 0.2), Some(2));
        assert_eq!(line_index_at(&path, Point::new(5.0, 5.0), 0.2), None);
    }
}
