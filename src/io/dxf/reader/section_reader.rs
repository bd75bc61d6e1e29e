//! DXF section readers

use super::stream_reader::{DxfCodePair, DxfStreamReader, PointReader};
use crate::document::Drawing;
use crate::entities::*;
use crate::error::Result;
use crate::tables::{Layer, LayerFlags};
use crate::types::{DxfVersion, Vector2, Vector3};

/// Section reader for parsing DXF sections
pub struct SectionReader<'a> {
    reader: &'a mut Box<dyn DxfStreamReader>,
}

impl<'a> SectionReader<'a> {
    /// Create a new section reader
    pub fn new(reader: &'a mut Box<dyn DxfStreamReader>) -> Self {
        Self { reader }
    }

    /// Read the HEADER section
    pub fn read_header(&mut self, drawing: &mut Drawing) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.code != 9 {
                continue;
            }

            match pair.value_string.as_str() {
                "$ACADVER" => {
                    if let Some(p) = self.read_variable_value()? {
                        drawing.version = DxfVersion::from_version_string(&p.value_string);
                    }
                }
                "$DWGCODEPAGE" => {
                    if let Some(p) = self.read_variable_value()? {
                        drawing.header.code_page = Some(p.value_string);
                    }
                }
                "$INSUNITS" => {
                    if let Some(p) = self.read_variable_value()? {
                        if let Some(v) = p.as_i16() {
                            drawing.header.insertion_units = v;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Read the value pair following a `9/$NAME` pair
    fn read_variable_value(&mut self) -> Result<Option<DxfCodePair>> {
        match self.reader.read_pair()? {
            Some(p) if p.code == 0 || p.code == 9 => {
                self.reader.push_back(p);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Read the TABLES section; only the LAYER table is kept
    pub fn read_tables(&mut self, drawing: &mut Drawing) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if !pair.is(0, "TABLE") {
                continue;
            }

            let is_layer = matches!(self.reader.read_pair()?, Some(p) if p.is(2, "LAYER"));
            if is_layer {
                self.read_layer_table(drawing)?;
            } else {
                self.skip_to_endtab()?;
            }
        }
        Ok(())
    }

    fn skip_to_endtab(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDTAB") {
                break;
            }
            if pair.is(0, "ENDSEC") {
                self.reader.push_back(pair);
                break;
            }
        }
        Ok(())
    }

    fn read_layer_table(&mut self, drawing: &mut Drawing) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDTAB") {
                break;
            }
            if pair.is(0, "ENDSEC") {
                self.reader.push_back(pair);
                break;
            }
            if pair.is(0, "LAYER") {
                if let Some(layer) = self.read_layer_entry()? {
                    drawing.layers.add(layer);
                }
            }
        }
        Ok(())
    }

    fn read_layer_entry(&mut self) -> Result<Option<Layer>> {
        let mut layer = Layer::new("");

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            match pair.code {
                2 => layer.name = pair.value_string,
                6 => layer.line_type = pair.value_string,
                62 => {
                    if let Some(color) = pair.as_i16() {
                        layer.color_index = color;
                    }
                }
                70 => {
                    if let Some(flags) = pair.as_i16() {
                        layer.flags = LayerFlags::from_bits_truncate(flags);
                    }
                }
                _ => {}
            }
        }

        Ok((!layer.name.is_empty()).then_some(layer))
    }

    /// Read the BLOCKS section
    pub fn read_blocks(&mut self, drawing: &mut Drawing) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.is(0, "BLOCK") {
                let block = self.read_block()?;
                if !block.name.is_empty() {
                    drawing.add_block(block);
                }
            }
        }
        Ok(())
    }

    fn read_block(&mut self) -> Result<Block> {
        let mut block = Block::default();
        let mut base = PointReader::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            match pair.code {
                2 => block.name = pair.value_string,
                3 if block.name.is_empty() => block.name = pair.value_string,
                70 => block.flags = pair.as_i16().unwrap_or(0),
                10 | 20 | 30 => {
                    base.add_coordinate(&pair);
                }
                _ => {}
            }
        }
        if let Some(pt) = base.get_point() {
            block.base_point = pt;
        }

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            match pair.value_string.as_str() {
                "ENDBLK" => {
                    self.skip_entity()?;
                    break;
                }
                "ENDSEC" => {
                    self.reader.push_back(pair);
                    break;
                }
                name => {
                    if let Some(entity) = self.read_entity(name)? {
                        block.entities.push(entity);
                    }
                }
            }
        }

        Ok(block)
    }

    /// Read the ENTITIES section
    pub fn read_entities(&mut self, drawing: &mut Drawing) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            if pair.value_string == "ENDSEC" {
                break;
            }
            if let Some(entity) = self.read_entity(&pair.value_string)? {
                drawing.add_entity(entity);
            }
        }
        Ok(())
    }

    /// Read the body of one entity whose `0/<type>` pair was just consumed
    fn read_entity(&mut self, type_name: &str) -> Result<Option<EntityType>> {
        let entity = match type_name {
            "POINT" => EntityType::Point(self.read_point()?),
            "LINE" => EntityType::Line(self.read_line()?),
            "CIRCLE" => EntityType::Circle(self.read_circle()?),
            "ARC" => EntityType::Arc(self.read_arc()?),
            "ELLIPSE" => EntityType::Ellipse(self.read_ellipse()?),
            "SPLINE" => EntityType::Spline(self.read_spline()?),
            "LWPOLYLINE" => EntityType::LwPolyline(self.read_lwpolyline()?),
            "POLYLINE" => EntityType::Polyline(self.read_polyline()?),
            "TEXT" => EntityType::Text(self.read_text(false)?),
            "ATTRIB" => EntityType::Text(self.read_text(true)?),
            "MTEXT" => EntityType::MText(self.read_mtext()?),
            "SOLID" => EntityType::Face(self.read_face(FaceKind::Solid)?),
            "TRACE" => EntityType::Face(self.read_face(FaceKind::Trace)?),
            "3DFACE" => EntityType::Face(self.read_face(FaceKind::Face3D)?),
            "HATCH" => EntityType::Hatch(self.read_hatch()?),
            "INSERT" => EntityType::Insert(self.read_insert()?),
            "DIMENSION" => EntityType::Dimension(self.read_dimension()?),
            other => {
                tracing::trace!(entity = other, "skipping unsupported entity");
                self.skip_entity()?;
                return Ok(None);
            }
        };
        Ok(Some(entity))
    }

    /// Consume pairs up to the next `0/...` pair
    fn skip_entity(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
        }
        Ok(())
    }

    /// Read the next pair of the current entity, stopping at the next `0/...`
    fn next_entity_pair(&mut self) -> Result<Option<DxfCodePair>> {
        match self.reader.read_pair()? {
            Some(pair) if pair.code == 0 => {
                self.reader.push_back(pair);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Read a POINT entity
    fn read_point(&mut self) -> Result<Point> {
        let mut point = Point::new();
        let mut location = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    location.add_coordinate(&pair);
                }
                _ => read_common(&mut point.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = location.get_point() {
            point.location = pt;
        }
        finish_common(&mut point.common, &extrusion);
        Ok(point)
    }

    /// Read a LINE entity
    fn read_line(&mut self) -> Result<Line> {
        let mut line = Line::new();
        let mut start = PointReader::new();
        let mut end = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    start.add_coordinate(&pair);
                }
                11 | 21 | 31 => {
                    end.add_coordinate(&pair);
                }
                _ => read_common(&mut line.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = start.get_point() {
            line.start = pt;
        }
        if let Some(pt) = end.get_point() {
            line.end = pt;
        }
        finish_common(&mut line.common, &extrusion);
        Ok(line)
    }

    /// Read a CIRCLE entity
    fn read_circle(&mut self) -> Result<Circle> {
        let mut circle = Circle::new();
        let mut center = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    center.add_coordinate(&pair);
                }
                40 => circle.radius = pair.as_double().unwrap_or(0.0),
                _ => read_common(&mut circle.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = center.get_point() {
            circle.center = pt;
        }
        finish_common(&mut circle.common, &extrusion);
        Ok(circle)
    }

    /// Read an ARC entity
    fn read_arc(&mut self) -> Result<Arc> {
        let mut arc = Arc::new();
        let mut center = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    center.add_coordinate(&pair);
                }
                40 => arc.radius = pair.as_double().unwrap_or(0.0),
                50 => arc.start_angle = pair.as_double().unwrap_or(0.0),
                51 => arc.end_angle = pair.as_double().unwrap_or(360.0),
                _ => read_common(&mut arc.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = center.get_point() {
            arc.center = pt;
        }
        finish_common(&mut arc.common, &extrusion);
        Ok(arc)
    }

    /// Read an ELLIPSE entity
    fn read_ellipse(&mut self) -> Result<Ellipse> {
        let mut ellipse = Ellipse::new();
        let mut center = PointReader::new();
        let mut major = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    center.add_coordinate(&pair);
                }
                11 | 21 | 31 => {
                    major.add_coordinate(&pair);
                }
                40 => ellipse.ratio = pair.as_double().unwrap_or(1.0),
                41 => ellipse.start_param = pair.as_double().unwrap_or(0.0),
                42 => ellipse.end_param = pair.as_double().unwrap_or(std::f64::consts::TAU),
                _ => read_common(&mut ellipse.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = center.get_point() {
            ellipse.center = pt;
        }
        if let Some(pt) = major.get_point() {
            ellipse.major_axis = pt;
        }
        finish_common(&mut ellipse.common, &extrusion);
        Ok(ellipse)
    }

    /// Read a SPLINE entity
    fn read_spline(&mut self) -> Result<Spline> {
        let mut spline = Spline::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            let value = pair.as_double().unwrap_or(0.0);
            match pair.code {
                70 => spline.flags = SplineFlags::from_bits_truncate(pair.as_i16().unwrap_or(0)),
                71 => spline.degree = pair.as_i16().unwrap_or(3).max(1) as usize,
                40 => spline.knots.push(value),
                41 => spline.weights.push(value),
                10 => spline.control_points.push(Vector3::new(value, 0.0, 0.0)),
                20 => set_last(&mut spline.control_points, |p| p.y = value),
                30 => set_last(&mut spline.control_points, |p| p.z = value),
                11 => spline.fit_points.push(Vector3::new(value, 0.0, 0.0)),
                21 => set_last(&mut spline.fit_points, |p| p.y = value),
                31 => set_last(&mut spline.fit_points, |p| p.z = value),
                // The spline's plane normal shares codes with the extrusion
                _ => read_common(&mut spline.common, &mut extrusion, pair),
            }
        }

        // Splines are stored in WCS
        spline.common.extrusion = Vector3::UNIT_Z;
        Ok(spline)
    }

    /// Read an LWPOLYLINE entity
    fn read_lwpolyline(&mut self) -> Result<LwPolyline> {
        let mut polyline = LwPolyline::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            let value = pair.as_double().unwrap_or(0.0);
            match pair.code {
                70 => polyline.flags = PolylineFlags::from_bits_truncate(pair.as_i16().unwrap_or(0)),
                38 => polyline.elevation = value,
                10 => polyline.vertices.push(LwVertex::new(value, 0.0)),
                20 => set_last(&mut polyline.vertices, |v| v.location.y = value),
                42 => set_last(&mut polyline.vertices, |v| v.bulge = value),
                // Per-vertex widths and the vertex identifier
                40 | 41 | 43 | 91 => {}
                _ => read_common(&mut polyline.common, &mut extrusion, pair),
            }
        }

        finish_common(&mut polyline.common, &extrusion);
        Ok(polyline)
    }

    /// Read a POLYLINE entity with its VERTEX records and SEQEND
    fn read_polyline(&mut self) -> Result<Polyline> {
        let mut polyline = Polyline::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                70 => polyline.flags = PolylineFlags::from_bits_truncate(pair.as_i16().unwrap_or(0)),
                30 => polyline.elevation = pair.as_double().unwrap_or(0.0),
                // Dummy point, always zero
                10 | 20 | 66 => {}
                _ => read_common(&mut polyline.common, &mut extrusion, pair),
            }
        }
        finish_common(&mut polyline.common, &extrusion);

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "VERTEX") {
                polyline.vertices.push(self.read_vertex()?);
            } else if pair.is(0, "SEQEND") {
                self.skip_entity()?;
                break;
            } else {
                self.reader.push_back(pair);
                break;
            }
        }

        Ok(polyline)
    }

    fn read_vertex(&mut self) -> Result<Vertex> {
        let mut vertex = Vertex::default();
        let mut location = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10 | 20 | 30 => {
                    location.add_coordinate(&pair);
                }
                42 => vertex.bulge = pair.as_double().unwrap_or(0.0),
                70 => vertex.flags = VertexFlags::from_bits_truncate(pair.as_i16().unwrap_or(0)),
                71..=74 => vertex.indices[(pair.code - 71) as usize] = pair.as_i32().unwrap_or(0),
                _ => {}
            }
        }

        if let Some(pt) = location.get_point() {
            vertex.location = pt;
        }
        Ok(vertex)
    }

    /// Read a TEXT entity, or an ATTRIB when `attribute` is set
    fn read_text(&mut self, attribute: bool) -> Result<Text> {
        let mut text = Text::new();
        let mut insertion = PointReader::new();
        let mut alignment = PointReader::new();
        let mut extrusion = PointReader::new();
        let vertical_code = if attribute { 74 } else { 73 };

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                1 => text.value = pair.value_string,
                2 if attribute => text.tag = Some(pair.value_string),
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                11 | 21 | 31 => {
                    alignment.add_coordinate(&pair);
                }
                40 => text.height = pair.as_double().unwrap_or(0.0),
                50 => text.rotation = pair.as_double().unwrap_or(0.0),
                72 => text.horizontal_alignment = pair.as_i16().unwrap_or(0),
                code if code == vertical_code => {
                    text.vertical_alignment = pair.as_i16().unwrap_or(0)
                }
                _ => read_common(&mut text.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = insertion.get_point() {
            text.insertion = pt;
        }
        text.alignment_point = alignment.get_point();
        if attribute && text.tag.is_none() {
            text.tag = Some(String::new());
        }
        finish_common(&mut text.common, &extrusion);
        Ok(text)
    }

    /// Read an MTEXT entity
    fn read_mtext(&mut self) -> Result<MText> {
        let mut mtext = MText::new();
        let mut insertion = PointReader::new();
        let mut extrusion = PointReader::new();
        let mut chunks = String::new();
        let mut last = String::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                // Long values are split into 250-char chunks; code 1 holds the tail
                3 => chunks.push_str(&pair.value_string),
                1 => last = pair.value_string,
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                40 => mtext.height = pair.as_double().unwrap_or(0.0),
                71 => mtext.attachment_point = pair.as_i16().unwrap_or(1),
                // Text direction vector
                11 | 21 | 31 => {}
                _ => read_common(&mut mtext.common, &mut extrusion, pair),
            }
        }

        chunks.push_str(&last);
        mtext.value = chunks;
        if let Some(pt) = insertion.get_point() {
            mtext.insertion = pt;
        }
        // MTEXT positions are WCS; the extrusion only orients the text
        finish_common(&mut mtext.common, &extrusion);
        Ok(mtext)
    }

    /// Read a SOLID, TRACE or 3DFACE entity
    fn read_face(&mut self, kind: FaceKind) -> Result<Face> {
        let mut face = Face::new(kind);
        let mut corners: [PointReader; 4] = Default::default();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                10..=13 | 20..=23 | 30..=33 => {
                    corners[(pair.code % 10) as usize].add_coordinate(&pair);
                }
                _ => read_common(&mut face.common, &mut extrusion, pair),
            }
        }

        for (i, corner) in corners.iter().enumerate() {
            face.corners[i] = match corner.get_point() {
                Some(pt) => pt,
                // A missing fourth corner makes a triangle
                None if i == 3 => face.corners[2],
                None => Vector3::ZERO,
            };
        }
        finish_common(&mut face.common, &extrusion);
        Ok(face)
    }

    /// Read an INSERT entity (also MINSERT arrays) and any following ATTRIBs
    fn read_insert(&mut self) -> Result<Insert> {
        let mut insert = Insert::new("");
        let mut insertion = PointReader::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            let value = pair.as_double();
            match pair.code {
                2 => insert.block_name = pair.value_string,
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                41 => insert.scale.x = value.unwrap_or(1.0),
                42 => insert.scale.y = value.unwrap_or(1.0),
                43 => insert.scale.z = value.unwrap_or(1.0),
                50 => insert.rotation = value.unwrap_or(0.0),
                70 => insert.columns = pair.as_i16().unwrap_or(1).max(1) as u16,
                71 => insert.rows = pair.as_i16().unwrap_or(1).max(1) as u16,
                44 => insert.column_spacing = value.unwrap_or(0.0),
                45 => insert.row_spacing = value.unwrap_or(0.0),
                66 => {}
                _ => read_common(&mut insert.common, &mut extrusion, pair),
            }
        }

        if let Some(pt) = insertion.get_point() {
            insert.insertion = pt;
        }
        finish_common(&mut insert.common, &extrusion);

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ATTRIB") {
                insert.attributes.push(self.read_text(true)?);
            } else if pair.is(0, "SEQEND") {
                self.skip_entity()?;
                break;
            } else {
                self.reader.push_back(pair);
                break;
            }
        }

        Ok(insert)
    }

    /// Read a DIMENSION entity; only the graphics block is kept
    fn read_dimension(&mut self) -> Result<Dimension> {
        let mut dimension = Dimension::new();
        let mut extrusion = PointReader::new();

        while let Some(pair) = self.next_entity_pair()? {
            match pair.code {
                2 => dimension.block_name = Some(pair.value_string),
                // Dimension points use the 1x..3x coordinate codes
                10..=16 | 20..=26 | 30..=36 => {}
                _ => read_common(&mut dimension.common, &mut extrusion, pair),
            }
        }

        finish_common(&mut dimension.common, &extrusion);
        Ok(dimension)
    }

    /// Read a HATCH entity
    ///
    /// Boundary data is positional, so after the path count (91) the pairs
    /// are consumed in the documented order instead of by code.
    fn read_hatch(&mut self) -> Result<Hatch> {
        let mut hatch = Hatch::new();
        let mut extrusion = PointReader::new();
        let mut paths_read = false;

        while let Some(pair) = self.next_entity_pair()? {
            if paths_read {
                // Pattern definition lines and seed points follow the paths
                continue;
            }
            match pair.code {
                30 => hatch.elevation = pair.as_double().unwrap_or(0.0),
                10 | 20 => {}
                2 => hatch.pattern_name = pair.value_string,
                70 => hatch.solid_fill = pair.as_i16() == Some(1),
                91 => {
                    let count = pair.as_i32().unwrap_or(0).max(0);
                    for _ in 0..count {
                        match self.read_hatch_path()? {
                            Some(path) => hatch.paths.push(path),
                            None => break,
                        }
                    }
                    paths_read = true;
                }
                _ => read_common(&mut hatch.common, &mut extrusion, pair),
            }
        }

        finish_common(&mut hatch.common, &extrusion);
        Ok(hatch)
    }

    /// Read the next pair if it has the given code, otherwise leave it
    fn read_optional(&mut self, code: i32) -> Result<Option<DxfCodePair>> {
        match self.reader.read_pair()? {
            Some(pair) if pair.code == code => Ok(Some(pair)),
            Some(pair) => {
                self.reader.push_back(pair);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn read_optional_double(&mut self, code: i32) -> Result<Option<f64>> {
        Ok(self.read_optional(code)?.and_then(|p| p.as_double()))
    }

    fn read_optional_int(&mut self, code: i32) -> Result<Option<i32>> {
        Ok(self.read_optional(code)?.and_then(|p| p.as_i32()))
    }

    fn read_optional_point(&mut self, x_code: i32) -> Result<Option<Vector2>> {
        let Some(x) = self.read_optional_double(x_code)? else {
            return Ok(None);
        };
        let y = self.read_optional_double(x_code + 10)?.unwrap_or(0.0);
        Ok(Some(Vector2::new(x, y)))
    }

    fn read_hatch_path(&mut self) -> Result<Option<BoundaryPath>> {
        let Some(flags) = self.read_optional_int(92)? else {
            return Ok(None);
        };
        let flags = BoundaryPathFlags::from_bits_truncate(flags);

        let kind = if flags.contains(BoundaryPathFlags::POLYLINE) {
            let has_bulge = self.read_optional_int(72)?.unwrap_or(0) != 0;
            let closed = self.read_optional_int(73)?.unwrap_or(1) != 0;
            let count = self.read_optional_int(93)?.unwrap_or(0).max(0);

            let mut vertices = Vec::with_capacity(count.min(4096) as usize);
            for _ in 0..count {
                let Some(location) = self.read_optional_point(10)? else {
                    break;
                };
                let bulge = if has_bulge {
                    self.read_optional_double(42)?.unwrap_or(0.0)
                } else {
                    0.0
                };
                vertices.push(LwVertex { location, bulge });
            }
            BoundaryPathKind::Polyline { vertices, closed }
        } else {
            let count = self.read_optional_int(93)?.unwrap_or(0).max(0);
            let mut edges = Vec::new();
            for _ in 0..count {
                match self.read_hatch_edge()? {
                    Some(edge) => edges.push(edge),
                    None => break,
                }
            }
            BoundaryPathKind::Edges(edges)
        };

        // Source boundary object references
        let sources = self.read_optional_int(97)?.unwrap_or(0).max(0);
        for _ in 0..sources {
            if self.read_optional(330)?.is_none() {
                break;
            }
        }

        Ok(Some(BoundaryPath { flags, kind }))
    }

    fn read_hatch_edge(&mut self) -> Result<Option<BoundaryEdge>> {
        let Some(edge_type) = self.read_optional_int(72)? else {
            return Ok(None);
        };

        let edge = match edge_type {
            1 => BoundaryEdge::Line {
                start: self.read_optional_point(10)?.unwrap_or_default(),
                end: self.read_optional_point(11)?.unwrap_or_default(),
            },
            2 => BoundaryEdge::Arc {
                center: self.read_optional_point(10)?.unwrap_or_default(),
                radius: self.read_optional_double(40)?.unwrap_or(0.0),
                start_angle: self.read_optional_double(50)?.unwrap_or(0.0),
                end_angle: self.read_optional_double(51)?.unwrap_or(360.0),
                counter_clockwise: self.read_optional_int(73)?.unwrap_or(1) != 0,
            },
            3 => BoundaryEdge::Ellipse {
                center: self.read_optional_point(10)?.unwrap_or_default(),
                major_axis: self.read_optional_point(11)?.unwrap_or(Vector2::new(1.0, 0.0)),
                ratio: self.read_optional_double(40)?.unwrap_or(1.0),
                start_angle: self.read_optional_double(50)?.unwrap_or(0.0),
                end_angle: self.read_optional_double(51)?.unwrap_or(360.0),
                counter_clockwise: self.read_optional_int(73)?.unwrap_or(1) != 0,
            },
            4 => self.read_hatch_spline_edge()?,
            _ => return Ok(None),
        };
        Ok(Some(edge))
    }

    fn read_hatch_spline_edge(&mut self) -> Result<BoundaryEdge> {
        let degree = self.read_optional_int(94)?.unwrap_or(3).max(1) as usize;
        let rational = self.read_optional_int(73)?.unwrap_or(0) != 0;
        let _periodic = self.read_optional_int(74)?;
        let knot_count = self.read_optional_int(95)?.unwrap_or(0).max(0);
        let control_count = self.read_optional_int(96)?.unwrap_or(0).max(0);

        let mut knots = Vec::new();
        for _ in 0..knot_count {
            match self.read_optional_double(40)? {
                Some(k) => knots.push(k),
                None => break,
            }
        }

        let mut control_points = Vec::new();
        let mut weights = Vec::new();
        for _ in 0..control_count {
            let Some(point) = self.read_optional_point(10)? else {
                break;
            };
            control_points.push(point);
            if rational {
                weights.push(self.read_optional_double(42)?.unwrap_or(1.0));
            }
        }

        // Fit data (R2010+) starts with its own 97 count, which is easily
        // confused with the path's source-object count: look one pair ahead.
        let mut fit_points = Vec::new();
        if let Some(count_pair) = self.read_optional(97)? {
            match self.reader.read_pair()? {
                Some(next) if matches!(next.code, 11 | 12 | 97) => {
                    self.reader.push_back(next);
                    for _ in 0..count_pair.as_i32().unwrap_or(0).max(0) {
                        match self.read_optional_point(11)? {
                            Some(point) => fit_points.push(point),
                            None => break,
                        }
                    }
                    self.read_optional_point(12)?;
                    self.read_optional_point(13)?;
                }
                Some(next) => {
                    self.reader.push_back(next);
                    self.reader.push_back(count_pair);
                }
                None => self.reader.push_back(count_pair),
            }
        }

        Ok(BoundaryEdge::Spline {
            degree,
            knots,
            control_points,
            weights,
            fit_points,
        })
    }
}

/// Apply a group code shared by every entity
fn read_common(common: &mut EntityCommon, extrusion: &mut PointReader, pair: DxfCodePair) {
    match pair.code {
        5 => common.handle = Some(pair.value_string),
        6 => common.line_type = Some(pair.value_string),
        8 => common.layer = pair.value_string,
        67 => common.paper_space = pair.as_i16() == Some(1),
        100 => common.subclasses.push(pair.value_string),
        210 | 220 | 230 => {
            extrusion.add_coordinate(&pair);
        }
        _ => {}
    }
}

fn finish_common(common: &mut EntityCommon, extrusion: &PointReader) {
    if let Some(normal) = extrusion.get_point_or(Vector3::ZERO) {
        if normal.length() > 0.0 {
            common.extrusion = normal;
        }
    }
}

/// Mutate the last element of a repeated-group list, if any
fn set_last<T>(items: &mut [T], update: impl FnOnce(&mut T)) {
    if let Some(item) = items.last_mut() {
        update(item);
    }
}
