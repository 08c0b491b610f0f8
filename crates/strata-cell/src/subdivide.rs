//! Ring and sector subdivision of material cells.
//!
//! Sectors split a cell into equal-angle wedges with planes through the
//! ring center (the origin when the cell has no bounding circle). Rings
//! split it into equal-area annuli between the innermost outside-circle
//! and the outermost inside-circle. Every wedge is crossed with every
//! annulus.

use crate::cell::{Bounds, MaterialCell};
use crate::surface::{Bound, Halfspace, Surface};
use smallvec::SmallVec;
use std::f64::consts::TAU;
use std::sync::Arc;
use strata_core::{GeometryError, IdAllocator, Point};

type Extra = SmallVec<[Bound; 2]>;

impl MaterialCell {
    /// Expand pending rings and sectors into sibling cells.
    ///
    /// The subcells get fresh ids from `ids`, keep the material and parent
    /// universe, and carry no pending parameters. A sector count of `1` is
    /// treated as unsectored. Rings require at least one bounding circle
    /// on its inside half-space.
    pub fn subdivide(&self, ids: &mut IdAllocator) -> Result<Vec<MaterialCell>, GeometryError> {
        let invalid = |reason: String| GeometryError::InvalidCell {
            cell: self.id,
            reason,
        };

        // Innermost bounding circle we are inside of, outermost we are outside of.
        let mut outer: Option<(Point, f64, &Arc<Surface>)> = None;
        let mut inner: Option<(Point, f64, &Arc<Surface>)> = None;
        for b in &self.bounds {
            let Some((center, radius)) = b.surface().as_circle() else {
                continue;
            };
            match b.halfspace() {
                Halfspace::Negative => {
                    if outer.is_none_or(|(_, r, _)| radius < r) {
                        outer = Some((center, radius, b.surface()));
                    }
                }
                Halfspace::Positive => {
                    if inner.is_none_or(|(_, r, _)| radius > r) {
                        inner = Some((center, radius, b.surface()));
                    }
                }
            }
        }

        let center = outer.map_or(Point::ORIGIN, |(c, _, _)| c);
        let sectors = if self.sectors >= 2 { self.sectors } else { 0 };

        let annuli = if self.rings == 0 {
            vec![Extra::new()]
        } else {
            let Some((_, r_max, outer_surface)) = outer else {
                return Err(invalid(format!(
                    "{} rings requested but no bounding circle encloses the cell",
                    self.rings
                )));
            };
            let r_min = inner.map_or(0.0, |(_, r, _)| r);
            if r_min >= r_max {
                return Err(invalid(format!(
                    "inner radius {r_min} is not smaller than outer radius {r_max}"
                )));
            }
            self.annuli(ids, center, r_min, r_max, outer_surface, inner.map(|i| i.2))?
        };

        let wedges = if sectors == 0 {
            vec![Extra::new()]
        } else {
            wedges(ids, center, sectors)?
        };

        // With rings, the two limiting circles are replaced by the ring circles.
        let limits = if self.rings == 0 {
            [None, None]
        } else {
            [outer.map(|o| o.2.id()), inner.map(|i| i.2.id())]
        };
        let base: Bounds = self
            .bounds
            .iter()
            .filter(|b| !limits.contains(&Some(b.surface().id())))
            .cloned()
            .collect();

        let mut out = Vec::with_capacity(wedges.len() * annuli.len());
        for wedge in &wedges {
            for annulus in &annuli {
                let mut bounds = base.clone();
                bounds.extend(wedge.iter().cloned());
                bounds.extend(annulus.iter().cloned());
                out.push(MaterialCell {
                    id: ids.cell_id(),
                    universe: self.universe,
                    material: self.material,
                    bounds,
                    rings: 0,
                    sectors: 0,
                });
            }
        }
        tracing::debug!(
            cell = %self.id,
            rings = self.rings,
            sectors = self.sectors,
            subcells = out.len(),
            "subdivided cell"
        );
        Ok(out)
    }

    /// Equal-area annuli from `r_min` to `r_max`, innermost first.
    fn annuli(
        &self,
        ids: &mut IdAllocator,
        center: Point,
        r_min: f64,
        r_max: f64,
        outer_surface: &Arc<Surface>,
        inner_surface: Option<&Arc<Surface>>,
    ) -> Result<Vec<Extra>, GeometryError> {
        let n = self.rings;
        let step = (r_max * r_max - r_min * r_min) / f64::from(n);
        let mut previous = inner_surface.cloned();
        let mut out = Vec::with_capacity(n as usize);
        for i in 1..=n {
            let ring_outer = if i == n {
                Arc::clone(outer_surface)
            } else {
                let radius = (r_min * r_min + f64::from(i) * step).sqrt();
                Arc::new(Surface::circle(ids.surface_id(), center.x, center.y, radius)?)
            };
            let mut extra = Extra::new();
            extra.push(Bound::new(Arc::clone(&ring_outer), Halfspace::Negative));
            if let Some(prev) = previous.take() {
                extra.push(Bound::new(prev, Halfspace::Positive));
            }
            previous = Some(ring_outer);
            out.push(extra);
        }
        Ok(out)
    }
}

/// Equal-angle wedges about `center`, counter-clockwise from +x.
fn wedges(
    ids: &mut IdAllocator,
    center: Point,
    sectors: u32,
) -> Result<Vec<Extra>, GeometryError> {
    let delta = TAU / f64::from(sectors);
    let mut planes = Vec::with_capacity(sectors as usize);
    for i in 0..sectors {
        // Positive side is counter-clockwise of the ray at angle i * delta.
        let (sin, cos) = (f64::from(i) * delta).sin_cos();
        let (a, b) = (-sin, cos);
        let c = -(a * center.x + b * center.y);
        planes.push(Arc::new(Surface::plane(ids.surface_id(), a, b, c)?));
    }
    let n = planes.len();
    Ok((0..n)
        .map(|i| {
            let mut extra = Extra::new();
            extra.push(Bound::new(Arc::clone(&planes[i]), Halfspace::Positive));
            extra.push(Bound::new(Arc::clone(&planes[(i + 1) % n]), Halfspace::Negative));
            extra
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use strata_core::{CellId, MaterialId, SurfaceId};

    const EPS: f64 = 1e-12;

    fn pin(radius: f64) -> MaterialCell {
        let c = Arc::new(Surface::circle(SurfaceId(1), 0.0, 0.0, radius).unwrap());
        MaterialCell::new(CellId(1), MaterialId(3)).bounded_by(c, Halfspace::Negative)
    }

    fn containing(cells: &[MaterialCell], p: Point) -> usize {
        cells
            .iter()
            .filter(|c| Cell::from((*c).clone()).contains(p, EPS))
            .count()
    }

    fn outer_radius(cell: &MaterialCell) -> f64 {
        cell.bounds()
            .iter()
            .filter(|b| b.halfspace() == Halfspace::Negative)
            .filter_map(|b| b.surface().as_circle())
            .map(|(_, r)| r)
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn rings_have_equal_area() {
        let mut ids = IdAllocator::default();
        let cells = pin(1.0).with_rings(4).subdivide(&mut ids).unwrap();
        assert_eq!(cells.len(), 4);
        let mut prev = 0.0;
        for cell in &cells {
            let r = outer_radius(cell);
            assert!((r * r - prev - 0.25).abs() < 1e-12, "ring area mismatch");
            prev = r * r;
            assert_eq!(cell.material(), MaterialId(3));
            assert!(!cell.has_pending_subdivision());
        }
    }

    #[test]
    fn ring_points_land_in_one_ring() {
        let mut ids = IdAllocator::default();
        let cells = pin(1.0).with_rings(3).subdivide(&mut ids).unwrap();
        for r in [0.1, 0.5, 0.7, 0.95] {
            assert_eq!(containing(&cells, Point::new(r, 0.013)), 1, "r = {r}");
        }
        assert_eq!(containing(&cells, Point::new(1.5, 0.0)), 0);
    }

    #[test]
    fn sectors_partition_the_disk() {
        let mut ids = IdAllocator::default();
        let cells = pin(1.0).with_sectors(4).subdivide(&mut ids).unwrap();
        assert_eq!(cells.len(), 4);
        for k in 0..16 {
            let angle = 0.2 + k as f64 * TAU / 16.0;
            let p = Point::new(0.5 * angle.cos(), 0.5 * angle.sin());
            assert_eq!(containing(&cells, p), 1, "angle = {angle}");
        }
    }

    #[test]
    fn rings_times_sectors() {
        let mut ids = IdAllocator::default();
        let cells = pin(2.0).with_rings(2).with_sectors(3).subdivide(&mut ids).unwrap();
        assert_eq!(cells.len(), 6);
        let mut seen: Vec<CellId> = cells.iter().map(|c| c.id()).collect();
        seen.dedup();
        assert_eq!(seen.len(), 6);
        for (r, angle) in [(0.3, 0.4), (1.9, 2.5), (1.2, 4.0), (0.9, 5.9)] {
            let p = Point::new(r * f64::cos(angle), r * f64::sin(angle));
            assert_eq!(containing(&cells, p), 1);
        }
    }

    #[test]
    fn annulus_keeps_its_inner_circle() {
        let inner = Arc::new(Surface::circle(SurfaceId(2), 0.0, 0.0, 0.5).unwrap());
        let cell = pin(1.0)
            .bounded_by(inner, Halfspace::Positive)
            .with_rings(2);
        let mut ids = IdAllocator::default();
        let cells = cell.subdivide(&mut ids).unwrap();
        assert_eq!(containing(&cells, Point::new(0.25, 0.0)), 0);
        assert_eq!(containing(&cells, Point::new(0.6, 0.0)), 1);
        assert_eq!(containing(&cells, Point::new(0.9, 0.0)), 1);
    }

    #[test]
    fn rings_keep_unrelated_circles() {
        // Lens: inside the unit circle and inside a second circle centered at (1, 0).
        let lens = Arc::new(Surface::circle(SurfaceId(7), 1.0, 0.0, 1.5).unwrap());
        let cell = pin(1.0).bounded_by(lens, Halfspace::Negative).with_rings(2);
        let mut ids = IdAllocator::default();
        let cells = cell.subdivide(&mut ids).unwrap();
        assert_eq!(cells.len(), 2);
        let has = |cell: &MaterialCell, id: SurfaceId| cell.bounds().iter().any(|b| b.surface().id() == id);
        assert!(cells.iter().all(|c| has(c, SurfaceId(7))));
        // Only the outermost ring is still bounded by the pin circle.
        assert!(!has(&cells[0], SurfaceId(1)));
        assert!(has(&cells[1], SurfaceId(1)));
        // Inside the unit circle but outside the lens.
        assert_eq!(containing(&cells, Point::new(-0.9, 0.0)), 0);
        assert_eq!(containing(&cells, Point::new(0.2, 0.0)), 1);
        assert_eq!(containing(&cells, Point::new(0.9, 0.0)), 1);
    }

    #[test]
    fn rings_need_a_circle() {
        let cell = MaterialCell::new(CellId(4), MaterialId(1)).with_rings(2);
        let err = cell.subdivide(&mut IdAllocator::default()).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCell { cell, .. } if cell == CellId(4)));
    }

    #[test]
    fn single_sector_is_a_plain_copy() {
        let mut ids = IdAllocator::default();
        let cells = pin(1.0).with_sectors(1).subdivide(&mut ids).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].bounds().len(), 1);
        assert_ne!(cells[0].id(), CellId(1));
    }
}
