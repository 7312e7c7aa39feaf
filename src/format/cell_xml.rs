//! CellCounter marker XML, the cell list file format.
//!
//! One file holds every curated point, grouped by type code under
//! `<Marker_Type>` elements. Marker order inside a group is insertion order.
//! The schema itself is owned by the downstream cell-counting tools; this
//! module only has to produce and consume it faithfully.

use std::io::Write;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::format::error::FormatError;
use crate::model::{Cell, CellType};

/// Filename recorded in the Image_Properties header. The curation widget
/// does not track which image a cell file belongs to.
const IMAGE_FILENAME_PLACEHOLDER: &str = "placeholder.tif";

/// Write a cell list to `path`, overwriting any existing file.
pub fn write_cells(path: &Path, cells: &[Cell]) -> Result<(), FormatError> {
    log::info!("Writing {} cells to {:?}", cells.len(), path);
    let xml = build_xml(cells)?;
    std::fs::write(path, xml)?;
    Ok(())
}

/// Read a cell list from `path`.
///
/// Cells come back in file order; coordinates are not permuted.
pub fn read_cells(path: &Path) -> Result<Vec<Cell>, FormatError> {
    let content = std::fs::read_to_string(path)?;
    parse_xml(&content)
}

/// Group cells by type code, preserving first-appearance order of codes and
/// insertion order within each group.
fn group_by_type(cells: &[Cell]) -> Vec<(i32, Vec<&Cell>)> {
    let mut groups: Vec<(i32, Vec<&Cell>)> = Vec::new();
    for cell in cells {
        let code = cell.tag.code();
        match groups.iter_mut().find(|(c, _)| *c == code) {
            Some((_, members)) => members.push(cell),
            None => groups.push((code, vec![cell])),
        }
    }
    groups
}

fn build_xml(cells: &[Cell]) -> Result<String, FormatError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    writer.write_event(Event::Start(BytesStart::new("CellCounter_Marker_File")))?;

    // <Image_Properties>
    writer.write_event(Event::Start(BytesStart::new("Image_Properties")))?;
    write_text_element(&mut writer, "Image_Filename", IMAGE_FILENAME_PLACEHOLDER)?;
    writer.write_event(Event::End(BytesEnd::new("Image_Properties")))?;

    // <Marker_Data>
    writer.write_event(Event::Start(BytesStart::new("Marker_Data")))?;

    for (code, members) in group_by_type(cells) {
        writer.write_event(Event::Start(BytesStart::new("Marker_Type")))?;
        write_text_element(&mut writer, "Type", &code.to_string())?;

        for cell in members {
            writer.write_event(Event::Start(BytesStart::new("Marker")))?;
            write_text_element(&mut writer, "MarkerX", &cell.pos[0].to_string())?;
            write_text_element(&mut writer, "MarkerY", &cell.pos[1].to_string())?;
            write_text_element(&mut writer, "MarkerZ", &cell.pos[2].to_string())?;
            writer.write_event(Event::End(BytesEnd::new("Marker")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Marker_Type")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Marker_Data")))?;
    writer.write_event(Event::End(BytesEnd::new("CellCounter_Marker_File")))?;

    let result = writer.into_inner();
    String::from_utf8(result).map_err(|_| FormatError::invalid_format("Invalid UTF-8 in XML"))
}

/// Write a simple text element.
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), FormatError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn parse_xml(content: &str) -> Result<Vec<Cell>, FormatError> {
    use quick_xml::Reader;

    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut cells = Vec::new();

    let mut current_element = String::new();
    let mut in_marker = false;
    let mut saw_root = false;

    let mut current_type = CellType::Unknown;
    let mut x = 0.0f64;
    let mut y = 0.0f64;
    let mut z = 0.0f64;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "CellCounter_Marker_File" => saw_root = true,
                    "Marker" => {
                        in_marker = true;
                        x = 0.0;
                        y = 0.0;
                        z = 0.0;
                    }
                    _ => {}
                }
                current_element = name;
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "Marker" {
                    cells.push(Cell::new([x, y, z], current_type));
                    in_marker = false;
                }
                current_element.clear();
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();

                if in_marker {
                    match current_element.as_str() {
                        "MarkerX" => x = parse_coordinate(&current_element, &text)?,
                        "MarkerY" => y = parse_coordinate(&current_element, &text)?,
                        "MarkerZ" => z = parse_coordinate(&current_element, &text)?,
                        _ => {}
                    }
                } else if current_element == "Type" {
                    let code = text.parse().unwrap_or(-1);
                    current_type = CellType::from_code(code);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FormatError::Xml(e)),
            _ => {}
        }
    }

    if !saw_root {
        return Err(FormatError::invalid_format(
            "not a CellCounter marker file (missing CellCounter_Marker_File root)",
        ));
    }

    log::info!("Read {} cells", cells.len());
    Ok(cells)
}

fn parse_coordinate(element: &str, value: &str) -> Result<f64, FormatError> {
    value.parse().map_err(|_| FormatError::InvalidCoordinate {
        element: element.to_string(),
        value: value.to_string(),
    })
}
