// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive overlays: hover crosshair, drag selection and polygon outline.

use kurbo::{BezPath, Point, Rect, Shape};
use vizir_heatmap::{GridTransform, Polygon};

use crate::mark::{Layer, OverlayMark};
use crate::style::OverlayStyle;
use crate::z_order;

/// Horizontal and vertical lines through `p`, spanning the plot.
pub fn crosshair(plot: Rect, p: Point, style: &OverlayStyle) -> OverlayMark {
    let mut path = BezPath::new();
    path.move_to((plot.x0, p.y));
    path.line_to((plot.x1, p.y));
    path.move_to((p.x, plot.y0));
    path.line_to((p.x, plot.y1));
    OverlayMark::stroke(
        Layer::Annotation,
        z_order::CROSSHAIR,
        path,
        style.annotation_color,
        style.crosshair_stroke_width,
    )
}

/// The outline of a drag-selection rectangle.
pub fn selection_box(rect: Rect, style: &OverlayStyle) -> OverlayMark {
    OverlayMark::stroke(
        Layer::Annotation,
        z_order::SELECTION,
        rect.abs().to_path(0.1),
        style.annotation_color,
        style.annotation_stroke_width,
    )
}

/// A closed outline through the centres of the polygon's vertex bins.
///
/// Returns `None` for polygons with fewer than two vertices.
pub fn polygon_outline(
    grid: &GridTransform,
    polygon: &Polygon,
    style: &OverlayStyle,
) -> Option<OverlayMark> {
    if !polygon.is_drawable() {
        return None;
    }
    let mut path = BezPath::new();
    let mut vertices = polygon.vertices().iter().map(|&bin| grid.bin_to_pixel(bin));
    path.move_to(vertices.next()?);
    for p in vertices {
        path.line_to(p);
    }
    path.close_path();
    Some(OverlayMark::stroke(
        Layer::Polygon,
        z_order::POLYGON,
        path,
        style.annotation_color,
        style.annotation_stroke_width,
    ))
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl;
    use vizir_heatmap::{Bin, BinRect};

    use super::*;
    use crate::mark::MarkPayload;

    fn path_of(mark: &OverlayMark) -> &BezPath {
        match &mark.payload {
            MarkPayload::Path(p) => &p.path,
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn crosshair_spans_the_plot() {
        let plot = Rect::new(10.0, 20.0, 110.0, 220.0);
        let mark = crosshair(plot, Point::new(50.0, 70.0), &OverlayStyle::default());
        assert_eq!(mark.layer, Layer::Annotation);
        let bounds = path_of(&mark).bounding_box();
        assert_eq!(bounds, plot);
    }

    #[test]
    fn selection_box_normalizes_corners() {
        let style = OverlayStyle::default();
        let mark = selection_box(Rect::new(90.0, 80.0, 30.0, 40.0), &style);
        assert_eq!(path_of(&mark).bounding_box(), Rect::new(30.0, 40.0, 90.0, 80.0));
        match &mark.payload {
            MarkPayload::Path(p) => assert_eq!(p.stroke_width, 3.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn polygon_outline_is_closed_through_bin_centres() {
        let grid =
            GridTransform::new(Rect::new(0.0, 0.0, 100.0, 100.0), BinRect::full(10, 10).unwrap())
                .unwrap();
        let style = OverlayStyle::default();
        let mut polygon = Polygon::new();
        polygon.push(Bin::new(0, 0));
        assert!(polygon_outline(&grid, &polygon, &style).is_none());

        polygon.push(Bin::new(9, 0));
        polygon.push(Bin::new(9, 9));
        let mark = polygon_outline(&grid, &polygon, &style).unwrap();
        assert_eq!(mark.layer, Layer::Polygon);
        let elements = path_of(&mark).elements();
        assert_eq!(elements[0], PathEl::MoveTo(Point::new(5.0, 95.0)));
        assert_eq!(elements[2], PathEl::LineTo(Point::new(95.0, 5.0)));
        assert_eq!(elements.last(), Some(&PathEl::ClosePath));
    }
}
