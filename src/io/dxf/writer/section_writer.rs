//! DXF section writers
//!
//! This module contains writers for each section of a DXF file:
//! HEADER, TABLES, BLOCKS, ENTITIES, and OBJECTS.

use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::entities::{Block, Entity};
use crate::error::Result;
use crate::io::dxf::record::DxfRecord;
use crate::scene::Scene;
use crate::tables::{DimStyle, Layer, LineType, TextStyle};
use crate::types::{BoundingBox2D, DxfVersion, Handle, HandleSeed, Point};
use indexmap::IndexMap;

const MODEL_SPACE: &str = "*Model_Space";
const PAPER_SPACE: &str = "*Paper_Space";

/// Writes all DXF sections.
///
/// Handles come from one seed shared by every section of a single write.
pub struct SectionWriter<'a, W: DxfStreamWriter + ?Sized> {
    writer: &'a mut W,
    handles: &'a mut HandleSeed,
    /// Block record handles by block name, layout blocks first
    block_records: IndexMap<String, Handle>,
}

impl<'a, W: DxfStreamWriter + ?Sized> SectionWriter<'a, W> {
    /// Create a new section writer
    pub fn new(writer: &'a mut W, handles: &'a mut HandleSeed) -> Self {
        Self {
            writer,
            handles,
            block_records: IndexMap::new(),
        }
    }

    // ===== HEADER =====

    /// Write the HEADER section; `$HANDSEED` is the seed's next handle
    pub fn write_header(&mut self, scene: &Scene, version: DxfVersion) -> Result<()> {
        self.writer.write_section_start("HEADER")?;

        self.write_header_variable("$ACADVER", |w| w.write_string(1, version.as_str()))?;
        self.write_header_variable("$DWGCODEPAGE", |w| w.write_string(3, "ANSI_1252"))?;

        let seed = self.handles.peek();
        self.write_header_variable("$HANDSEED", |w| w.write_handle(5, seed))?;
        self.write_header_variable("$CLAYER", |w| w.write_string(8, &scene.current_layer))?;

        let extremes = scene
            .extremes()
            .unwrap_or_else(|| BoundingBox2D::from_point(Point::ORIGIN));
        self.write_header_variable("$EXTMIN", |w| w.write_point3d(10, extremes.min))?;
        self.write_header_variable("$EXTMAX", |w| w.write_point3d(10, extremes.max))?;

        self.writer.write_section_end()
    }

    /// Write a header variable
    fn write_header_variable<F>(&mut self, name: &str, write_value: F) -> Result<()>
    where
        F: FnOnce(&mut W) -> Result<()>,
    {
        self.writer.write_string(9, name)?;
        write_value(self.writer)
    }

    // ===== TABLES =====

    /// Write the TABLES section
    pub fn write_tables(&mut self, scene: &Scene) -> Result<()> {
        self.writer.write_section_start("TABLES")?;

        self.write_vport_table(scene)?;

        let table = self.write_table_header("LTYPE", scene.line_types.len())?;
        for line_type in scene.line_types.iter() {
            self.write_ltype_entry(line_type, table)?;
        }
        self.write_table_end()?;

        let table = self.write_table_header("LAYER", scene.layers.len())?;
        for layer in scene.layers.iter() {
            self.write_layer_entry(layer, table)?;
        }
        self.write_table_end()?;

        let table = self.write_table_header("STYLE", scene.text_styles.len())?;
        for style in scene.text_styles.iter() {
            self.write_style_entry(style, table)?;
        }
        self.write_table_end()?;

        self.write_table_header("VIEW", 0)?;
        self.write_table_end()?;
        self.write_table_header("UCS", 0)?;
        self.write_table_end()?;

        let table = self.write_table_header("APPID", 1)?;
        self.write_entry_start("APPID", table, "AcDbRegAppTableRecord")?;
        self.writer.write_string(2, "ACAD")?;
        self.writer.write_i16(70, 0)?;
        self.write_table_end()?;

        let table = self.write_table_header("DIMSTYLE", scene.dim_styles.len())?;
        self.writer.write_subclass("AcDbDimStyleTable")?;
        for style in scene.dim_styles.iter() {
            self.write_dimstyle_entry(style, table)?;
        }
        self.write_table_end()?;

        self.write_block_record_table(scene)?;

        self.writer.write_section_end()
    }

    /// A single `*ACTIVE` viewport showing the drawing's extent
    fn write_vport_table(&mut self, scene: &Scene) -> Result<()> {
        let table = self.write_table_header("VPORT", 1)?;
        self.write_entry_start("VPORT", table, "AcDbViewportTableRecord")?;
        self.writer.write_string(2, "*ACTIVE")?;
        self.writer.write_i16(70, 0)?;

        let (centre, height) = match scene.extremes() {
            Some(bbox) if bbox.height() > 0.0 || bbox.width() > 0.0 => {
                (bbox.center(), bbox.height().max(bbox.width()) * 1.1)
            }
            Some(bbox) => (bbox.center(), 1.0),
            None => (Point::ORIGIN, 1.0),
        };
        self.writer.write_point2d(10, Point::new(0.0, 0.0))?;
        self.writer.write_point2d(11, Point::new(1.0, 1.0))?;
        self.writer.write_point2d(12, centre)?;
        self.writer.write_double(40, height)?;
        self.writer.write_double(41, 1.0)?;

        self.write_table_end()
    }

    fn write_ltype_entry(&mut self, line_type: &LineType, owner: Handle) -> Result<()> {
        self.write_entry_start("LTYPE", owner, "AcDbLinetypeTableRecord")?;
        self.writer.write_string(2, &line_type.name)?;
        self.writer.write_i16(70, 0)?;
        self.writer.write_string(3, &line_type.description)?;
        self.writer.write_i16(72, 65)?;
        self.writer.write_i16(73, line_type.elements.len() as i16)?;
        self.writer.write_double(40, line_type.pattern_length())?;

        for element in &line_type.elements {
            self.writer.write_double(49, *element)?;
            self.writer.write_i16(74, 0)?;
        }
        Ok(())
    }

    fn write_layer_entry(&mut self, layer: &Layer, owner: Handle) -> Result<()> {
        self.write_entry_start("LAYER", owner, "AcDbLayerTableRecord")?;
        self.writer.write_string(2, &layer.name)?;
        self.writer.write_i16(70, layer.flags.bits())?;

        // negative if the layer is off
        let index = match layer.color.aci() {
            0 | 256 => 7,
            index => index as i16,
        };
        self.writer.write_i16(62, if layer.off { -index } else { index })?;
        if !layer.color.has_exact_aci() {
            if let Some(true_colour) = layer.color.true_colour() {
                self.writer.write_i32(420, true_colour)?;
            }
        }

        self.writer.write_string(6, &layer.line_type)?;
        self.writer.write_i16(370, layer.line_weight.value())?;
        self.writer.write_i16(290, i16::from(layer.is_plottable))
    }

    fn write_style_entry(&mut self, style: &TextStyle, owner: Handle) -> Result<()> {
        self.write_entry_start("STYLE", owner, "AcDbTextStyleTableRecord")?;
        self.writer.write_string(2, &style.name)?;
        self.writer.write_i16(70, 0)?;
        self.writer.write_double(40, style.height)?;
        self.writer.write_double(41, style.width_factor)?;
        self.writer.write_double(50, style.oblique_angle)?;
        self.writer.write_i16(71, style.flags.bits())?;
        // last height used
        let last_height = if style.has_fixed_height() { style.height } else { 2.5 };
        self.writer.write_double(42, last_height)?;
        self.writer.write_string(3, &style.font_file)?;
        self.writer.write_string(4, &style.big_font_file)
    }

    fn write_dimstyle_entry(&mut self, style: &DimStyle, owner: Handle) -> Result<()> {
        self.writer.write_string(0, "DIMSTYLE")?;
        let handle = self.handles.allocate();
        self.writer.write_handle(105, handle)?;
        self.writer.write_handle(330, owner)?;
        self.writer.write_subclass("AcDbSymbolTableRecord")?;
        self.writer.write_subclass("AcDbDimStyleTableRecord")?;
        self.writer.write_string(2, &style.name)?;
        self.writer.write_i16(70, 0)?;

        self.writer.write_double(40, style.dimscale)?;
        self.writer.write_double(41, style.dimasz)?;
        self.writer.write_double(42, style.dimexo)?;
        self.writer.write_double(44, style.dimexe)?;
        self.writer.write_double(140, style.dimtxt)?;
        self.writer.write_double(147, style.dimgap)?;
        self.writer.write_i16(176, style.dimclrd)?;
        self.writer.write_i16(177, style.dimclre)?;
        self.writer.write_i16(178, style.dimclrt)?;
        self.writer.write_i16(271, style.dimdec)
    }

    /// Block records for both layouts and every block definition
    fn write_block_record_table(&mut self, scene: &Scene) -> Result<()> {
        let names: Vec<&str> = [MODEL_SPACE, PAPER_SPACE]
            .into_iter()
            .chain(scene.blocks().map(Block::name))
            .collect();

        let table = self.write_table_header("BLOCK_RECORD", names.len())?;
        for name in names {
            let handle = self.write_entry_start("BLOCK_RECORD", table, "AcDbBlockTableRecord")?;
            self.writer.write_string(2, name)?;
            self.writer.write_i16(70, 0)?;
            self.writer.write_i16(280, 1)?;
            self.writer.write_i16(281, 0)?;
            self.block_records.insert(name.to_string(), handle);
        }
        self.write_table_end()
    }

    /// Write table header, returning the table's handle
    fn write_table_header(&mut self, name: &str, count: usize) -> Result<Handle> {
        let handle = self.handles.allocate();
        self.writer.write_string(0, "TABLE")?;
        self.writer.write_string(2, name)?;
        self.writer.write_handle(5, handle)?;
        // tables are owned by the document root
        self.writer.write_handle(330, Handle::NULL)?;
        self.writer.write_subclass("AcDbSymbolTable")?;
        self.writer.write_i16(70, count as i16)?;
        Ok(handle)
    }

    fn write_table_end(&mut self) -> Result<()> {
        self.writer.write_string(0, "ENDTAB")
    }

    /// Start a table entry, returning its handle
    fn write_entry_start(&mut self, kind: &str, owner: Handle, subclass: &str) -> Result<Handle> {
        let handle = self.handles.allocate();
        self.writer.write_string(0, kind)?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, owner)?;
        self.writer.write_subclass("AcDbSymbolTableRecord")?;
        self.writer.write_subclass(subclass)?;
        Ok(handle)
    }

    // ===== BLOCKS =====

    /// Write the BLOCKS section; must follow [`Self::write_tables`]
    pub fn write_blocks(&mut self, scene: &Scene) -> Result<()> {
        self.writer.write_section_start("BLOCKS")?;

        for name in [MODEL_SPACE, PAPER_SPACE] {
            let owner = self.block_record(name);
            self.write_layout_block(name, owner)?;
        }

        for block in scene.blocks() {
            let owner = self.block_record(block.name());
            self.write_record(&block.dxf(), owner)?;
            for child in block.children() {
                self.write_record(&child.as_entity().dxf(), owner)?;
            }
            self.write_block_end(owner, block.layer(), false)?;
        }

        self.writer.write_section_end()
    }

    /// Empty `BLOCK`/`ENDBLK` pair of a layout
    fn write_layout_block(&mut self, name: &str, owner: Handle) -> Result<()> {
        let paper_space = name == PAPER_SPACE;
        let handle = self.handles.allocate();
        self.writer.write_string(0, "BLOCK")?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, owner)?;
        self.writer.write_subclass("AcDbEntity")?;
        if paper_space {
            self.writer.write_i16(67, 1)?;
        }
        self.writer.write_string(8, "0")?;
        self.writer.write_subclass("AcDbBlockBegin")?;
        self.writer.write_string(2, name)?;
        self.writer.write_i16(70, 0)?;
        self.writer.write_point3d(10, Point::ORIGIN)?;
        self.writer.write_string(3, name)?;
        self.writer.write_string(1, "")?;

        self.write_block_end(owner, "0", paper_space)
    }

    fn write_block_end(&mut self, owner: Handle, layer: &str, paper_space: bool) -> Result<()> {
        let handle = self.handles.allocate();
        self.writer.write_string(0, "ENDBLK")?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, owner)?;
        self.writer.write_subclass("AcDbEntity")?;
        if paper_space {
            self.writer.write_i16(67, 1)?;
        }
        self.writer.write_string(8, layer)?;
        self.writer.write_subclass("AcDbBlockEnd")
    }

    fn block_record(&self, name: &str) -> Handle {
        self.block_records.get(name).copied().unwrap_or(Handle::NULL)
    }

    // ===== ENTITIES =====

    /// Write the ENTITIES section; every item is owned by model space
    pub fn write_entities(&mut self, scene: &Scene) -> Result<()> {
        self.writer.write_section_start("ENTITIES")?;

        let owner = self.block_record(MODEL_SPACE);
        for entity in scene.entities() {
            self.write_record(&entity.as_entity().dxf(), owner)?;
        }

        self.writer.write_section_end()
    }

    /// Write one record and its followers, returning the record's handle
    fn write_record(&mut self, record: &DxfRecord, owner: Handle) -> Result<Handle> {
        let handle = self.handles.allocate();
        self.writer.write_string(0, record.kind)?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, owner)?;
        for (code, value) in &record.pairs {
            self.writer.write_value(*code, value)?;
        }
        for follower in &record.followers {
            self.write_record(follower, handle)?;
        }
        Ok(handle)
    }

    // ===== OBJECTS =====

    /// Write the OBJECTS section: the root dictionary and its group
    /// dictionary
    pub fn write_objects(&mut self) -> Result<()> {
        self.writer.write_section_start("OBJECTS")?;

        let root = self.handles.allocate();
        let groups = self.handles.allocate();

        self.writer.write_string(0, "DICTIONARY")?;
        self.writer.write_handle(5, root)?;
        self.writer.write_handle(330, Handle::NULL)?;
        self.writer.write_subclass("AcDbDictionary")?;
        self.writer.write_i16(281, 1)?;
        self.writer.write_string(3, "ACAD_GROUP")?;
        self.writer.write_handle(350, groups)?;

        self.writer.write_string(0, "DICTIONARY")?;
        self.writer.write_handle(5, groups)?;
        self.writer.write_handle(330, root)?;
        self.writer.write_subclass("AcDbDictionary")?;
        self.writer.write_i16(281, 1)?;

        self.writer.write_section_end()
    }
}

#[cfg(test)]
mod tests {
    use super::super::text_writer::DxfTextWriter;
    use super::*;
    use crate::entities::{EntityData, EntityKind};
    use crate::scene::SceneBuilder;

    fn write_with<F>(write: F) -> String
    where
        F: FnOnce(&mut SectionWriter<'_, DxfTextWriter<&mut Vec<u8>>>),
    {
        let mut buf = Vec::new();
        let mut handles = HandleSeed::new(1);
        {
            let mut text = DxfTextWriter::new(&mut buf);
            let mut sections = SectionWriter::new(&mut text, &mut handles);
            write(&mut sections);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_record_followers_owned_by_record() {
        let mut record = DxfRecord::new("POLYLINE");
        record.push(8, "0");
        let mut vertex = DxfRecord::new("VERTEX");
        vertex.push(8, "0");
        record.followers.push(vertex);

        let output = write_with(|w| {
            let handle = w.write_record(&record, Handle::new(0x1F)).unwrap();
            assert_eq!(handle, Handle::new(1));
        });
        assert_eq!(
            output,
            "  0\nPOLYLINE\n  5\n1\n330\n1F\n  8\n0\n  0\nVERTEX\n  5\n2\n330\n1\n  8\n0\n"
        );
    }

    #[test]
    fn test_layer_off_written_negative() {
        let mut layer = Layer::with_color("Hidden", crate::types::Color::RED);
        layer.off = true;
        let output = write_with(|w| w.write_layer_entry(&layer, Handle::new(2)).unwrap());
        assert!(output.contains(" 62\n-1\n"));
        assert!(!output.contains("420\n"));
    }

    #[test]
    fn test_blocks_follow_block_records() {
        let mut scene = Scene::new();
        scene
            .add_entity(EntityKind::Block, &EntityData::with_points(vec![Point::ORIGIN]).name("Door"))
            .unwrap();
        scene
            .add_entity_to_block(
                EntityKind::Line,
                &EntityData::with_points(vec![Point::ORIGIN, Point::new(1.0, 0.0)]),
                "Door",
            )
            .unwrap();

        let output = write_with(|w| {
            w.write_tables(&scene).unwrap();
            w.write_blocks(&scene).unwrap();
            assert_eq!(w.block_records.len(), 3);
        });
        let blocks = &output[output.find("BLOCKS").unwrap()..];
        assert!(blocks.contains("*Model_Space"));
        assert!(blocks.contains("*Paper_Space"));
        assert_eq!(blocks.matches("ENDBLK").count(), 3);
        assert!(blocks.find("LINE").unwrap() > blocks.find("Door").unwrap());
    }

    #[test]
    fn test_header_handseed() {
        let scene = Scene::new();
        let output = write_with(|w| {
            w.handles.allocate();
            w.write_header(&scene, DxfVersion::AC1015).unwrap();
        });
        assert!(output.contains("$ACADVER\n  1\nAC1015\n"));
        assert!(output.contains("$HANDSEED\n  5\n2\n"));
        assert!(output.contains("$CLAYER\n  8\n0\n"));
    }
}
