//! DXF section readers
//!
//! Reading is a flat loop over tag-0 records. Each record reader consumes the
//! pairs up to the next tag 0 and pushes that pair back. The only state kept
//! between records is the block currently open.

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::entities::text::decode_caret;
use crate::entities::{EntityData, EntityKind, Rectangle};
use crate::error::Result;
use crate::notification::NotificationType;
use crate::scene::SceneBuilder;
use crate::tables::{DimStyle, Layer, LayerFlags, LineType, TextGenerationFlags, TextStyle};
use crate::types::{Color, DxfVersion, LineWeight, Point};

/// Point groups addressed by codes 10..=18 (x), 20..=28 (y), 30..=38 (z)
const POINT_GROUPS: usize = 9;

/// Vertex flag of a spline frame control point
const VERTEX_SPLINE_FRAME: i32 = 16;

/// Where entity records are currently routed
#[derive(Debug, Clone, PartialEq)]
enum OpenBlock {
    /// Top level
    None,
    /// Child list of a block definition
    Named(String),
    /// Model or paper space block; its content is not kept
    Layout(String),
}

/// `*Model_Space`, `*Paper_Space`, `*Paper_Space0`, ...
fn is_layout_block(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper == "*MODEL_SPACE" || upper.starts_with("*PAPER_SPACE")
}

/// Tags that carry nothing this model keeps
fn is_ignored(code: i32) -> bool {
    matches!(
        code,
        5 | 6 | 39 | 48 | 60 | 67 | 100 | 102 | 210 | 220 | 230 | 284 | 330 | 347 | 348 | 360 | 390 | 410 | 440
            | 1000..=1071
    )
}

/// Coordinates of one point group, paired up as they arrive
#[derive(Debug, Default, Clone)]
struct PointGroup {
    pending_x: Option<f64>,
    points: Vec<Point>,
}

impl PointGroup {
    fn add_x(&mut self, x: f64) {
        if let Some(previous) = self.pending_x.replace(x) {
            self.points.push(Point::new(previous, 0.0));
        }
    }

    fn add_y(&mut self, y: f64) {
        let x = self.pending_x.take().unwrap_or(0.0);
        self.points.push(Point::new(x, y));
    }

    fn flush(&mut self) {
        if let Some(x) = self.pending_x.take() {
            self.points.push(Point::new(x, 0.0));
        }
    }
}

/// Accumulation scope of one entity record
#[derive(Debug, Default)]
struct RecordScope {
    data: EntityData,
    groups: [PointGroup; POINT_GROUPS],
    aci: Option<i16>,
    true_colour: Option<i32>,
}

impl RecordScope {
    /// Assign the tags every entity shares; false for any other tag
    fn assign_common(&mut self, pair: &DxfCodePair<'_>) -> bool {
        match pair.code {
            8 => self.data.layer = pair.as_str().to_string(),
            62 => self.aci = pair.as_i16(),
            420 => self.true_colour = pair.as_i32(),
            370 => {
                if let Some(value) = pair.as_i16() {
                    self.data.line_weight = LineWeight::from_value(value);
                }
            }
            10..=18 => {
                if let Some(x) = pair.as_double() {
                    self.groups[(pair.code - 10) as usize].add_x(x);
                }
            }
            20..=28 => {
                if let Some(y) = pair.as_double() {
                    self.groups[(pair.code - 20) as usize].add_y(y);
                }
            }
            30..=38 => {}
            _ => return false,
        }
        true
    }

    /// First point of each listed group, skipping groups that never appeared
    fn points(&self, groups: &[usize]) -> Vec<Point> {
        groups
            .iter()
            .filter_map(|group| self.groups[*group].points.first().copied())
            .collect()
    }

    /// Every point of one group, in file order
    fn all_points(&self, group: usize) -> Vec<Point> {
        self.groups[group].points.clone()
    }

    /// Number of complete points in group 0
    fn vertex_count(&self) -> usize {
        self.groups[0].points.len()
    }
}

/// Reads every section of a document into a scene builder
pub struct SectionReader<'a, 'b, B: SceneBuilder + ?Sized> {
    reader: &'b mut dyn DxfStreamReader<'a>,
    builder: &'b mut B,
    open_block: OpenBlock,
}

impl<'a, 'b, B: SceneBuilder + ?Sized> SectionReader<'a, 'b, B> {
    /// Create a new section reader
    pub fn new(reader: &'b mut dyn DxfStreamReader<'a>, builder: &'b mut B) -> Self {
        Self {
            reader,
            builder,
            open_block: OpenBlock::None,
        }
    }

    /// Read records until `EOF`
    pub fn read_document(&mut self) -> Result<()> {
        loop {
            let pair = self.reader.read_pair()?;
            if pair.code != 0 {
                // stray pair outside any record
                continue;
            }

            match pair.as_str() {
                "EOF" => return Ok(()),
                "SECTION" => self.read_section()?,
                "ENDSEC" | "ENDBLK" => {
                    self.open_block = OpenBlock::None;
                    self.skip_record()?;
                }
                "LAYER" => self.read_layer_entry()?,
                "LTYPE" => self.read_linetype_entry()?,
                "STYLE" => self.read_textstyle_entry()?,
                "DIMSTYLE" => self.read_dimstyle_entry()?,
                "BLOCK" => self.read_block(pair.line)?,
                "TABLE" | "ENDTAB" | "CLASS" | "VPORT" | "VIEW" | "UCS" | "APPID" | "BLOCK_RECORD" | "SEQEND"
                | "DICTIONARY" => self.skip_record()?,
                keyword => self.read_entity(keyword, pair.line)?,
            }
        }
    }

    fn notify(&mut self, notification_type: NotificationType, message: String) {
        self.reader.notifications_mut().notify(notification_type, message);
    }

    /// Consume pairs up to the next tag 0
    fn skip_record(&mut self) -> Result<()> {
        self.read_record(|_| {})
    }

    /// Feed every pair up to the next tag 0 to `assign`
    fn read_record<F>(&mut self, mut assign: F) -> Result<()>
    where
        F: FnMut(&DxfCodePair<'a>),
    {
        loop {
            let pair = self.reader.read_pair()?;
            if pair.code == 0 {
                self.reader.push_back(pair);
                return Ok(());
            }
            assign(&pair);
        }
    }

    /// Read an entity record: shared tags go to the scope, the rest to
    /// `assign`, which returns false for tags it does not know
    fn read_entity_record<F>(&mut self, keyword: &str, mut assign: F) -> Result<RecordScope>
    where
        F: FnMut(&mut RecordScope, &DxfCodePair<'a>) -> bool,
    {
        let mut scope = RecordScope::default();
        loop {
            let pair = self.reader.read_pair()?;
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if scope.assign_common(&pair) || assign(&mut scope, &pair) || is_ignored(pair.code) {
                continue;
            }
            self.notify(
                NotificationType::Warning,
                format!("unknown tag {} in {} at line {} ignored", pair.code, keyword, pair.line),
            );
        }
        for group in scope.groups.iter_mut() {
            group.flush();
        }
        Ok(scope)
    }

    // ===== Sections =====

    /// Read a `SECTION` record; for `HEADER` this includes every variable
    fn read_section(&mut self) -> Result<()> {
        self.open_block = OpenBlock::None;
        let mut name = "";
        let mut variable = "";
        loop {
            let pair = self.reader.read_pair()?;
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            match pair.code {
                2 if name.is_empty() => name = pair.as_str(),
                9 => variable = pair.as_str(),
                _ if name == "HEADER" => self.read_header_value(variable, &pair),
                _ => {}
            }
        }
        tracing::trace!(section = name, "section start");
        Ok(())
    }

    fn read_header_value(&mut self, variable: &str, pair: &DxfCodePair<'a>) {
        match (variable, pair.code) {
            ("$CLAYER", 8) if !pair.as_str().is_empty() => self.builder.set_current_layer(pair.as_str()),
            ("$ACADVER", 1) => {
                let version = DxfVersion::from_version_string(pair.as_str());
                tracing::debug!(%version, "document version");
            }
            ("$DWGCODEPAGE", 3) => tracing::debug!(code_page = pair.as_str(), "document code page"),
            _ => {}
        }
    }

    // ===== Table Readers =====

    /// Read a single LAYER entry
    fn read_layer_entry(&mut self) -> Result<()> {
        let mut layer = Layer::new("");
        let mut aci: Option<i16> = None;
        let mut true_colour: Option<i32> = None;

        self.read_record(|pair| match pair.code {
            2 => layer.name = pair.as_str().to_string(),
            6 => layer.line_type = pair.as_str().to_string(),
            62 => aci = pair.as_i16(),
            420 => true_colour = pair.as_i32(),
            70 => {
                if let Some(flags) = pair.as_i16() {
                    layer.flags = LayerFlags::from_bits_truncate(flags);
                }
            }
            290 => layer.is_plottable = pair.as_i16() != Some(0),
            370 => {
                if let Some(value) = pair.as_i16() {
                    layer.line_weight = LineWeight::from_value(value);
                }
            }
            _ => {}
        })?;

        // a negative colour index means the layer is off
        if let Some(index) = aci {
            let index = i32::from(index);
            layer.off = index < 0;
            if let Some(colour) = Color::from_aci(index.abs()).filter(|c| !c.is_symbolic()) {
                layer.color = colour;
            }
        }
        if let Some(value) = true_colour {
            layer.color = Color::from_true_colour(value);
        }

        if layer.name.is_empty() {
            self.notify(NotificationType::Warning, "unnamed LAYER entry skipped".to_string());
        } else {
            self.builder.add_layer(layer);
        }
        Ok(())
    }

    /// Read a single LTYPE entry
    fn read_linetype_entry(&mut self) -> Result<()> {
        let mut line_type = LineType::new("");
        self.read_record(|pair| match pair.code {
            2 => line_type.name = pair.as_str().to_string(),
            3 => line_type.description = pair.value.to_string(),
            49 => {
                if let Some(length) = pair.as_double() {
                    line_type.elements.push(length);
                }
            }
            _ => {}
        })?;

        if !line_type.name.is_empty() {
            self.builder.add_line_type(line_type);
        }
        Ok(())
    }

    /// Read a single STYLE entry; unnamed shape file entries are dropped
    fn read_textstyle_entry(&mut self) -> Result<()> {
        let mut style = TextStyle::new("");
        self.read_record(|pair| match pair.code {
            2 => style.name = pair.as_str().to_string(),
            3 => style.font_file = pair.as_str().to_string(),
            4 => style.big_font_file = pair.as_str().to_string(),
            40 => style.height = pair.as_double().unwrap_or(style.height),
            41 => style.width_factor = pair.as_double().unwrap_or(style.width_factor),
            50 => style.oblique_angle = pair.as_double().unwrap_or(style.oblique_angle),
            71 => {
                if let Some(flags) = pair.as_i16() {
                    style.flags = TextGenerationFlags::from_bits_truncate(flags);
                }
            }
            _ => {}
        })?;

        if !style.name.is_empty() {
            self.builder.add_style(style);
        }
        Ok(())
    }

    /// Read a single DIMSTYLE entry
    fn read_dimstyle_entry(&mut self) -> Result<()> {
        let mut style = DimStyle::new("");
        self.read_record(|pair| {
            let value = pair.as_double();
            match pair.code {
                2 => style.name = pair.as_str().to_string(),
                40 => style.dimscale = value.unwrap_or(style.dimscale),
                41 => style.dimasz = value.unwrap_or(style.dimasz),
                42 => style.dimexo = value.unwrap_or(style.dimexo),
                44 => style.dimexe = value.unwrap_or(style.dimexe),
                140 => style.dimtxt = value.unwrap_or(style.dimtxt),
                147 => style.dimgap = value.unwrap_or(style.dimgap),
                176 => style.dimclrd = pair.as_i16().unwrap_or(style.dimclrd),
                177 => style.dimclre = pair.as_i16().unwrap_or(style.dimclre),
                178 => style.dimclrt = pair.as_i16().unwrap_or(style.dimclrt),
                271 => style.dimdec = pair.as_i16().unwrap_or(style.dimdec),
                _ => {}
            }
        })?;

        if !style.name.is_empty() {
            self.builder.add_dim_style(style);
        }
        Ok(())
    }

    // ===== Blocks =====

    /// Read a `BLOCK` record and open it; children follow until `ENDBLK`
    fn read_block(&mut self, line: usize) -> Result<()> {
        let mut scope = self.read_entity_record("BLOCK", |scope, pair| match pair.code {
            2 => {
                scope.data.name = Some(pair.as_str().to_string());
                true
            }
            70 => {
                scope.data.flags = pair.as_i32().unwrap_or(0);
                true
            }
            4 => {
                scope.data.text = Some(pair.value.to_string());
                true
            }
            1 | 3 => true,
            _ => false,
        })?;
        scope.data.points = scope.points(&[0]);

        let name = scope.data.name.clone().unwrap_or_default();
        if is_layout_block(&name) {
            self.open_block = OpenBlock::Layout(name);
            return Ok(());
        }

        let data = self.finish(scope, "BLOCK", line);
        if let Err(err) = self.builder.add_entity(EntityKind::Block, &data) {
            self.notify(NotificationType::Error, format!("BLOCK at line {} skipped: {}", line, err));
        }
        // children of a rejected block are reported against its name
        self.open_block = OpenBlock::Named(name);
        Ok(())
    }

    // ===== Entities =====

    fn read_entity(&mut self, keyword: &str, line: usize) -> Result<()> {
        let (kind, scope) = match keyword {
            "LINE" => self.read_line()?,
            "CIRCLE" => self.read_circle()?,
            "ARC" => self.read_arc()?,
            "ELLIPSE" => self.read_ellipse()?,
            "LWPOLYLINE" => self.read_lwpolyline()?,
            "POLYLINE" => self.read_polyline()?,
            "SOLID" => self.read_solid()?,
            "SPLINE" => self.read_spline()?,
            "TEXT" => self.read_text()?,
            "INSERT" => self.read_insert()?,
            "DIMENSION" => self.read_dimension(line)?,
            _ => {
                self.notify(
                    NotificationType::NotImplemented,
                    format!("{} record at line {} skipped", keyword, line),
                );
                return self.skip_record();
            }
        };
        let data = self.finish(scope, keyword, line);
        self.commit(keyword, line, kind, data);
        Ok(())
    }

    /// Resolve the colour tags of a finished record
    fn finish(&mut self, mut scope: RecordScope, keyword: &str, line: usize) -> EntityData {
        if let Some(value) = scope.true_colour {
            scope.data.color = Color::from_true_colour(value);
        } else if let Some(index) = scope.aci {
            match Color::from_aci(i32::from(index)) {
                Some(colour) => scope.data.color = colour,
                None => self.notify(
                    NotificationType::Warning,
                    format!("colour index {} of {} at line {} read as BYLAYER", index, keyword, line),
                ),
            }
        }
        scope.data
    }

    /// Hand a completed record to the builder; `INSERT` always goes to the
    /// top level
    fn commit(&mut self, keyword: &str, line: usize, kind: EntityKind, data: EntityData) {
        if let OpenBlock::Layout(name) = &self.open_block {
            let message = format!("{} at line {} in layout block {} skipped", keyword, line, name);
            self.notify(NotificationType::NotSupported, message);
            return;
        }

        let result = match &self.open_block {
            OpenBlock::Named(name) if kind != EntityKind::Insert => {
                self.builder.add_entity_to_block(kind, &data, name)
            }
            _ => self.builder.add_entity(kind, &data),
        };
        if let Err(err) = result {
            self.notify(
                NotificationType::Error,
                format!("{} at line {} skipped: {}", keyword, line, err),
            );
        }
    }

    /// Read a LINE entity
    fn read_line(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("LINE", |_, _| false)?;
        scope.data.points = scope.points(&[0, 1]);
        Ok((EntityKind::Line, scope))
    }

    /// Read a CIRCLE entity
    fn read_circle(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("CIRCLE", |scope, pair| match pair.code {
            40 => {
                scope.data.radius = pair.as_double();
                true
            }
            _ => false,
        })?;
        scope.data.points = scope.points(&[0]);
        Ok((EntityKind::Circle, scope))
    }

    /// Read an ARC entity
    fn read_arc(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("ARC", |scope, pair| {
            let value = pair.as_double();
            match pair.code {
                40 => scope.data.radius = value,
                50 => scope.data.start_angle = value,
                51 => scope.data.end_angle = value,
                _ => return false,
            }
            true
        })?;
        scope.data.points = scope.points(&[0]);
        Ok((EntityKind::Arc, scope))
    }

    /// Read an ELLIPSE entity; the major axis (11) is relative to the centre
    fn read_ellipse(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("ELLIPSE", |scope, pair| {
            let value = pair.as_double();
            match pair.code {
                40 => scope.data.ratio = value,
                41 => scope.data.start_param = value,
                42 => scope.data.end_param = value,
                _ => return false,
            }
            true
        })?;
        scope.data.points = scope.points(&[0, 1]);
        scope.data.ratio.get_or_insert(1.0);
        Ok((EntityKind::Ellipse, scope))
    }

    /// Read an LWPOLYLINE entity. A closed, straight, right-angled
    /// four-vertex outline is a rectangle.
    fn read_lwpolyline(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("LWPOLYLINE", |scope, pair| match pair.code {
            70 => {
                scope.data.closed = pair.as_i16().unwrap_or(0) & 1 != 0;
                true
            }
            42 => {
                // bulge of the vertex just read
                let count = scope.vertex_count();
                if let (Some(bulge), true) = (pair.as_double(), count > 0) {
                    if scope.data.bulges.len() < count {
                        scope.data.bulges.resize(count, 0.0);
                    }
                    scope.data.bulges[count - 1] = bulge;
                }
                true
            }
            40 | 41 | 43 | 90 | 91 => true,
            _ => false,
        })?;
        scope.data.points = scope.all_points(0);

        let straight = scope.data.bulges.iter().all(|bulge| *bulge == 0.0);
        let kind = if scope.data.closed && straight && Rectangle::is_right_angled(&scope.data.points) {
            EntityKind::Rectangle
        } else {
            EntityKind::Polyline
        };
        Ok((kind, scope))
    }

    /// Read a POLYLINE entity with its VERTEX records and SEQEND
    fn read_polyline(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("POLYLINE", |scope, pair| match pair.code {
            70 => {
                scope.data.closed = pair.as_i16().unwrap_or(0) & 1 != 0;
                true
            }
            40 | 41 | 66 | 71..=75 => true,
            _ => false,
        })?;

        let mut points = Vec::new();
        let mut bulges = Vec::new();
        loop {
            let pair = self.reader.read_pair()?;
            if pair.is("VERTEX") {
                let vertex = self.read_entity_record("VERTEX", |vertex, pair| match pair.code {
                    42 => {
                        vertex.data.bulges = pair.as_double().into_iter().collect();
                        true
                    }
                    70 => {
                        vertex.data.flags = pair.as_i32().unwrap_or(0);
                        true
                    }
                    40 | 41 | 50 | 71..=74 | 91 => true,
                    _ => false,
                })?;
                if vertex.data.flags & VERTEX_SPLINE_FRAME != 0 {
                    continue;
                }
                if let Some(point) = vertex.points(&[0]).first() {
                    points.push(*point);
                    bulges.push(vertex.data.bulges.first().copied().unwrap_or(0.0));
                }
            } else if pair.is("SEQEND") {
                self.skip_record()?;
                break;
            } else {
                self.reader.push_back(pair);
                break;
            }
        }

        scope.data.points = points;
        scope.data.bulges = bulges;
        Ok((EntityKind::Polyline, scope))
    }

    /// Read a SOLID entity; corners are stored 1-2-4-3 on the wire
    fn read_solid(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("SOLID", |_, _| false)?;
        scope.data.points = scope.points(&[0, 1, 3, 2]);
        Ok((EntityKind::FilledRectangle, scope))
    }

    /// Read a SPLINE entity
    fn read_spline(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("SPLINE", |scope, pair| match pair.code {
            70 => {
                scope.data.closed = pair.as_i16().unwrap_or(0) & 1 != 0;
                true
            }
            71 => {
                scope.data.degree = pair.as_i32();
                true
            }
            40 => {
                if let Some(knot) = pair.as_double() {
                    scope.data.knots.push(knot);
                }
                true
            }
            41..=44 | 72..=74 => true,
            _ => false,
        })?;
        scope.data.points = scope.all_points(0);
        scope.data.fit_points = scope.all_points(1);
        Ok((EntityKind::Spline, scope))
    }

    /// Read a TEXT entity
    fn read_text(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("TEXT", |scope, pair| {
            match pair.code {
                1 => scope.data.text = Some(decode_caret(pair.value)),
                7 => scope.data.style = Some(pair.as_str().to_string()),
                40 => scope.data.height = pair.as_double(),
                50 => scope.data.rotation = pair.as_double(),
                71 => scope.data.generation_flags = pair.as_i16().unwrap_or(0),
                72 => scope.data.horizontal_alignment = pair.as_i16().unwrap_or(0),
                73 => scope.data.vertical_alignment = pair.as_i16().unwrap_or(0),
                41 | 51 => {}
                _ => return false,
            }
            true
        })?;
        scope.data.points = scope.points(&[0]);
        scope.data.alignment_point = scope.points(&[1]).first().copied();
        Ok((EntityKind::Text, scope))
    }

    /// Read an INSERT entity
    fn read_insert(&mut self) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("INSERT", |scope, pair| {
            match pair.code {
                2 => scope.data.name = Some(pair.as_str().to_string()),
                41 | 42 => {
                    if let Some(value) = pair.as_double() {
                        let scale = scope.data.scale.get_or_insert((1.0, 1.0));
                        if pair.code == 41 {
                            scale.0 = value;
                        } else {
                            scale.1 = value;
                        }
                    }
                }
                50 => scope.data.rotation = pair.as_double(),
                43..=45 | 66 | 70 | 71 => {}
                _ => return false,
            }
            true
        })?;
        scope.data.points = scope.points(&[0]);
        Ok((EntityKind::Insert, scope))
    }

    /// Read a DIMENSION entity; points are ordered 13, 14, 10, 11
    fn read_dimension(&mut self, line: usize) -> Result<(EntityKind, RecordScope)> {
        let mut scope = self.read_entity_record("DIMENSION", |scope, pair| {
            match pair.code {
                1 => scope.data.text = Some(pair.value.to_string()),
                2 => scope.data.name = Some(pair.as_str().to_string()),
                3 => scope.data.style = Some(pair.as_str().to_string()),
                50 => scope.data.rotation = pair.as_double(),
                70 => scope.data.dimension_type = pair.as_i16().unwrap_or(0),
                41 | 42 | 51..=53 | 71 | 72 | 280 => {}
                _ => return false,
            }
            true
        })?;
        scope.data.points = scope.points(&[3, 4, 0, 1]);

        let type_code = scope.data.dimension_type & 0x0F;
        if type_code > 1 {
            self.notify(
                NotificationType::NotSupported,
                format!("dimension type {} at line {} read as rotated", type_code, line),
            );
        }
        Ok((EntityKind::Dimension, scope))
    }
}
