//! Turning drawing entities into world-space geometries
//!
//! Block references are expanded inline: every entity of the referenced
//! block is placed through the reference's transform, once per array cell.
//! Entities drawn on layer `0` inside a block take the layer of the
//! reference that places them.
//!
//! Expansion is bounded twice: by nesting depth, and by the total number of
//! entities placed through block references in one drawing. A reference
//! that would go past either limit is kept without geometry.

use super::tessellate::{
    arc_points, bulge_points, directed_arc_points, ellipse_points, nurbs_points,
};
use super::Geometry;
use crate::document::Drawing;
use crate::entities::*;
use crate::types::{Transform, Vector2, Vector3};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Deepest block nesting that is still expanded
pub const MAX_BLOCK_DEPTH: usize = 16;

/// Most entities placed through block references in one drawing
pub const MAX_EXPANDED_ENTITIES: usize = 1_000_000;

/// One output feature: an entity placed in world space
#[derive(Debug, Clone)]
pub struct PlacedEntity<'a> {
    /// DXF type name of the source entity
    pub type_name: &'static str,
    pub common: &'a EntityCommon,
    /// Effective layer after block inheritance
    pub layer: String,
    /// Handle of the entity, or of the outermost block reference placing it
    pub handle: Option<String>,
    pub text: Option<String>,
    /// `None` when no geometry could be built
    pub geometry: Option<Geometry>,
}

/// Block entities still allowed to be placed, shared by every worker
/// building the same drawing
struct ExpansionBudget {
    limit: usize,
    remaining: AtomicUsize,
    exhausted: AtomicBool,
}

impl ExpansionBudget {
    fn new(limit: usize) -> Self {
        ExpansionBudget {
            limit,
            remaining: AtomicUsize::new(limit),
            exhausted: AtomicBool::new(false),
        }
    }

    /// Reserve `count` placements, all or nothing
    fn take(&self, count: usize) -> bool {
        let taken = self
            .remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| {
                left.checked_sub(count)
            })
            .is_ok();
        if !taken && !self.exhausted.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                limit = self.limit,
                requested = count,
                "block expansion limit reached, references skipped"
            );
        }
        taken
    }
}

/// Where a block's contents are being placed
struct Placement<'p> {
    transform: Transform,
    parent_layer: Option<&'p str>,
    handle: Option<&'p str>,
    depth: usize,
    budget: &'p ExpansionBudget,
}

impl<'p> Placement<'p> {
    fn root(budget: &'p ExpansionBudget) -> Self {
        Placement {
            transform: Transform::identity(),
            parent_layer: None,
            handle: None,
            depth: 0,
            budget,
        }
    }

    /// Reserve room for `cells` copies of `block`
    fn reserve(&self, block: &Block, cells: Option<usize>) -> bool {
        let count = cells.and_then(|c| c.checked_mul(block.entities.len().max(1)));
        self.budget.take(count.unwrap_or(usize::MAX))
    }

    fn layer_for(&self, common: &EntityCommon) -> String {
        match self.parent_layer {
            Some(parent) if common.layer == "0" => parent.to_string(),
            _ => common.layer.clone(),
        }
    }

    fn handle_for(&self, common: &EntityCommon) -> Option<String> {
        self.handle
            .or(common.handle.as_deref())
            .map(str::to_string)
    }

    /// Object coordinate system of `common`, then this placement
    fn ocs(&self, common: &EntityCommon) -> Transform {
        Transform::from_extrusion(common.extrusion).then(&self.transform)
    }
}

/// Build every model- and paper-space entity of the drawing, in file order
///
/// Top-level entities are processed in parallel; the output order matches
/// the order of the ENTITIES section.
pub fn build_features(drawing: &Drawing) -> Vec<PlacedEntity<'_>> {
    build_features_within(drawing, MAX_EXPANDED_ENTITIES)
}

/// [`build_features`] placing at most `limit` entities through block references
pub fn build_features_within(drawing: &Drawing, limit: usize) -> Vec<PlacedEntity<'_>> {
    let budget = ExpansionBudget::new(limit);
    drawing
        .entities()
        .par_iter()
        .flat_map_iter(|entity| {
            let mut out = Vec::new();
            place(drawing, entity, &Placement::root(&budget), &mut out);
            out
        })
        .collect()
}

/// A reference that was not expanded: kept, without geometry
fn unexpanded<'d>(
    entity: &'d EntityType,
    layer: String,
    handle: Option<String>,
) -> PlacedEntity<'d> {
    PlacedEntity {
        type_name: entity.type_name(),
        common: entity.common(),
        layer,
        handle,
        text: None,
        geometry: None,
    }
}

fn place<'d>(
    drawing: &'d Drawing,
    entity: &'d EntityType,
    placement: &Placement<'_>,
    out: &mut Vec<PlacedEntity<'d>>,
) {
    let common = entity.common();
    let layer = placement.layer_for(common);
    let handle = placement.handle_for(common);

    match entity {
        EntityType::Insert(insert) => {
            place_insert(drawing, entity, insert, placement, layer, handle, out)
        }
        EntityType::Dimension(dimension) => {
            let block = dimension
                .block_name
                .as_deref()
                .and_then(|name| drawing.block(name));
            match block {
                Some(block)
                    if placement.depth < MAX_BLOCK_DEPTH && placement.reserve(block, Some(1)) =>
                {
                    let child = Placement {
                        transform: placement.transform,
                        parent_layer: Some(&layer),
                        handle: handle.as_deref(),
                        depth: placement.depth + 1,
                        budget: placement.budget,
                    };
                    for e in &block.entities {
                        place(drawing, e, &child, out);
                    }
                }
                _ => out.push(unexpanded(entity, layer, handle)),
            }
        }
        _ => out.push(PlacedEntity {
            type_name: entity.type_name(),
            common,
            geometry: entity_geometry(entity, placement),
            text: entity.text(),
            layer,
            handle,
        }),
    }
}

fn place_insert<'d>(
    drawing: &'d Drawing,
    entity: &'d EntityType,
    insert: &'d Insert,
    placement: &Placement<'_>,
    layer: String,
    handle: Option<String>,
    out: &mut Vec<PlacedEntity<'d>>,
) {
    match drawing.block(&insert.block_name) {
        Some(_) if placement.depth >= MAX_BLOCK_DEPTH => {
            tracing::warn!(block = %insert.block_name, "block nesting too deep, reference skipped");
            out.push(unexpanded(entity, layer.clone(), handle.clone()));
        }
        Some(block) if !placement.reserve(block, insert.cell_count()) => {
            tracing::debug!(
                block = %insert.block_name,
                columns = insert.columns,
                rows = insert.rows,
                "block reference over the expansion limit"
            );
            out.push(unexpanded(entity, layer.clone(), handle.clone()));
        }
        Some(block) => {
            let child_handle = handle.as_deref();
            for cell in insert.placements(block.base_point) {
                let child = Placement {
                    transform: cell.then(&placement.transform),
                    parent_layer: Some(&layer),
                    handle: child_handle,
                    depth: placement.depth + 1,
                    budget: placement.budget,
                };
                for e in &block.entities {
                    place(drawing, e, &child, out);
                }
            }
        }
        // Unknown block: keep the reference as its insertion point
        None => out.push(PlacedEntity {
            type_name: entity.type_name(),
            common: &insert.common,
            layer: layer.clone(),
            handle: handle.clone(),
            text: None,
            geometry: Some(Geometry::Point(
                placement.ocs(&insert.common).apply(insert.insertion),
            )),
        }),
    }

    for attribute in &insert.attributes {
        out.push(PlacedEntity {
            type_name: "ATTRIB",
            common: &attribute.common,
            layer: placement.layer_for(&attribute.common),
            handle: placement.handle_for(&attribute.common),
            text: Some(attribute.value.clone()),
            geometry: Some(Geometry::Point(
                placement.ocs(&attribute.common).apply(attribute.anchor()),
            )),
        });
    }
}

fn entity_geometry(entity: &EntityType, placement: &Placement<'_>) -> Option<Geometry> {
    let world = &placement.transform;
    let geometry = match entity {
        EntityType::Point(point) => Geometry::Point(world.apply(point.location)),
        EntityType::Line(line) => {
            Geometry::LineString(vec![world.apply(line.start), world.apply(line.end)])
        }
        EntityType::Circle(circle) => {
            if circle.radius <= 0.0 {
                return None;
            }
            let ocs = placement.ocs(&circle.common);
            let points = arc_points(circle.center.xy(), circle.radius, 0.0, 360.0);
            Geometry::LineString(lift(&points, circle.center.z, &ocs))
        }
        EntityType::Arc(arc) => {
            if arc.radius <= 0.0 {
                return None;
            }
            let ocs = placement.ocs(&arc.common);
            let points = arc_points(arc.center.xy(), arc.radius, arc.start_angle, arc.end_angle);
            Geometry::LineString(lift(&points, arc.center.z, &ocs))
        }
        EntityType::Ellipse(ellipse) => {
            let points = ellipse_points(
                ellipse.center,
                ellipse.major_axis,
                ellipse.ratio,
                ellipse.common.extrusion,
                ellipse.start_param,
                ellipse.end_param,
            );
            Geometry::LineString(points.into_iter().map(|p| world.apply(p)).collect())
        }
        EntityType::Spline(spline) => {
            let points = if spline.control_points.len() >= 2 {
                nurbs_points(
                    spline.degree,
                    &spline.knots,
                    &spline.control_points,
                    &spline.weights,
                )
            } else {
                spline.fit_points.clone()
            };
            Geometry::LineString(points.into_iter().map(|p| world.apply(p)).collect())
        }
        EntityType::LwPolyline(polyline) => {
            let ocs = placement.ocs(&polyline.common);
            let points = bulge_path(&polyline.vertices, polyline.is_closed());
            Geometry::LineString(lift(&points, polyline.elevation, &ocs))
        }
        EntityType::Polyline(polyline) => return polyline_geometry(polyline, placement),
        EntityType::Text(text) => {
            Geometry::Point(placement.ocs(&text.common).apply(text.anchor()))
        }
        EntityType::MText(text) => Geometry::Point(world.apply(text.insertion)),
        EntityType::Face(face) => {
            let transform = match face.kind {
                FaceKind::Solid | FaceKind::Trace => placement.ocs(&face.common),
                FaceKind::Face3D => placement.transform,
            };
            let ring = face.ring().into_iter().map(|p| transform.apply(p)).collect();
            Geometry::Polygon(vec![ring])
        }
        EntityType::Hatch(hatch) => return hatch_geometry(hatch, placement),
        EntityType::Insert(_) | EntityType::Dimension(_) => return None,
    };
    Some(geometry)
}

/// Put 2D OCS points at `elevation` and map them to world space
fn lift(points: &[Vector2], elevation: f64, transform: &Transform) -> Vec<Vector3> {
    points
        .iter()
        .map(|p| transform.apply(p.with_z(elevation)))
        .collect()
}

/// Vertices of a bulged path, arcs tessellated, closing vertex repeated
fn bulge_path(vertices: &[LwVertex], closed: bool) -> Vec<Vector2> {
    let mut out = Vec::with_capacity(vertices.len() + 1);
    for (i, vertex) in vertices.iter().enumerate() {
        out.push(vertex.location);
        let next = match vertices.get(i + 1) {
            Some(next) => Some(next.location),
            None if closed => Some(vertices[0].location),
            None => None,
        };
        if let Some(next) = next {
            out.extend(bulge_points(vertex.location, next, vertex.bulge));
        }
    }
    if closed {
        if let Some(first) = vertices.first() {
            if out.last() != Some(&first.location) || out.len() == 1 {
                out.push(first.location);
            }
        }
    }
    out
}

fn polyline_geometry(polyline: &Polyline, placement: &Placement<'_>) -> Option<Geometry> {
    if polyline.is_polyface_mesh() {
        return polyface_geometry(polyline, &placement.transform);
    }
    if polyline.is_polygon_mesh() {
        tracing::trace!("polygon meshes are not exported");
        return None;
    }

    let vertices = polyline
        .vertices
        .iter()
        .filter(|v| !v.flags.contains(VertexFlags::SPLINE_FRAME));

    if polyline.is_planar() {
        let ocs = placement.ocs(&polyline.common);
        let lw: Vec<LwVertex> = vertices
            .map(|v| LwVertex {
                location: v.location.xy(),
                bulge: v.bulge,
            })
            .collect();
        let points = bulge_path(&lw, polyline.is_closed());
        Some(Geometry::LineString(lift(&points, polyline.elevation, &ocs)))
    } else {
        let mut points: Vec<Vector3> = vertices
            .map(|v| placement.transform.apply(v.location))
            .collect();
        if polyline.is_closed() {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        Some(Geometry::LineString(points))
    }
}

/// Each face record of a polyface mesh becomes one polygon
fn polyface_geometry(polyline: &Polyline, world: &Transform) -> Option<Geometry> {
    let (faces, locations): (Vec<&Vertex>, Vec<&Vertex>) =
        polyline.vertices.iter().partition(|v| v.is_face_record());
    let locations: Vec<Vector3> = locations.iter().map(|v| world.apply(v.location)).collect();

    let polygons: Vec<Vec<Vec<Vector3>>> = faces
        .iter()
        .filter_map(|face| {
            let mut ring: Vec<Vector3> = face
                .indices
                .iter()
                .filter(|&&i| i != 0)
                .filter_map(|&i| locations.get(i.unsigned_abs() as usize - 1).copied())
                .collect();
            ring.dedup();
            let first = *ring.first()?;
            ring.push(first);
            (ring.len() >= 4).then(|| vec![ring])
        })
        .collect();

    (!polygons.is_empty()).then_some(Geometry::MultiPolygon(polygons))
}

fn hatch_geometry(hatch: &Hatch, placement: &Placement<'_>) -> Option<Geometry> {
    let any_outer = hatch
        .paths
        .iter()
        .any(|p| p.flags.intersects(BoundaryPathFlags::EXTERNAL | BoundaryPathFlags::OUTERMOST));

    let mut shells: Vec<Vec<Vec<Vector2>>> = Vec::new();
    let mut holes: Vec<Vec<Vector2>> = Vec::new();
    for (i, path) in hatch.paths.iter().enumerate() {
        let ring = boundary_ring(path);
        if ring.len() < 4 {
            continue;
        }
        let outer = if any_outer {
            path.flags
                .intersects(BoundaryPathFlags::EXTERNAL | BoundaryPathFlags::OUTERMOST)
        } else {
            i == 0
        };
        if outer {
            shells.push(vec![ring]);
        } else {
            holes.push(ring);
        }
    }

    for hole in holes {
        match shells.iter_mut().find(|s| ring_contains(&s[0], hole[0])) {
            Some(shell) => shell.push(hole),
            None => shells.push(vec![hole]),
        }
    }

    let ocs = placement.ocs(&hatch.common);
    let mut polygons: Vec<Vec<Vec<Vector3>>> = shells
        .iter()
        .map(|rings| {
            rings
                .iter()
                .map(|ring| lift(ring, hatch.elevation, &ocs))
                .collect()
        })
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(polygons)),
    }
}

/// Closed ring of one hatch boundary path, in OCS
fn boundary_ring(path: &BoundaryPath) -> Vec<Vector2> {
    let mut ring = match &path.kind {
        BoundaryPathKind::Polyline { vertices, .. } => bulge_path(vertices, true),
        BoundaryPathKind::Edges(edges) => {
            let mut points: Vec<Vector2> = Vec::new();
            for edge in edges {
                for p in edge_points(edge) {
                    if points.last() != Some(&p) {
                        points.push(p);
                    }
                }
            }
            points
        }
    };

    if let Some(&first) = ring.first() {
        if ring.last() != Some(&first) || ring.len() == 1 {
            ring.push(first);
        }
    }
    ring
}

fn edge_points(edge: &BoundaryEdge) -> Vec<Vector2> {
    match edge {
        BoundaryEdge::Line { start, end } => vec![*start, *end],
        BoundaryEdge::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            counter_clockwise,
        } => directed_arc_points(*center, *radius, *start_angle, *end_angle, *counter_clockwise),
        BoundaryEdge::Ellipse {
            center,
            major_axis,
            ratio,
            start_angle,
            end_angle,
            counter_clockwise,
        } => {
            let (start, end) = if *counter_clockwise {
                (*start_angle, *end_angle)
            } else {
                (-*end_angle, -*start_angle)
            };
            let mut points: Vec<Vector2> = ellipse_points(
                center.with_z(0.0),
                major_axis.with_z(0.0),
                *ratio,
                Vector3::UNIT_Z,
                start.to_radians(),
                end.to_radians(),
            )
            .iter()
            .map(Vector3::xy)
            .collect();
            if !*counter_clockwise {
                points.reverse();
            }
            points
        }
        BoundaryEdge::Spline {
            degree,
            knots,
            control_points,
            weights,
            fit_points,
        } => {
            if control_points.len() >= 2 {
                let control: Vec<Vector3> = control_points.iter().map(|p| p.with_z(0.0)).collect();
                nurbs_points(*degree, knots, &control, weights)
                    .iter()
                    .map(Vector3::xy)
                    .collect()
            } else {
                fit_points.clone()
            }
        }
    }
}

/// Even-odd point in ring test
fn ring_contains(ring: &[Vector2], point: Vector2) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
