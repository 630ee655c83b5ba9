use crate::config::OutputFormat;
use crate::errors::AppResult;
use crate::model::MindMapData;
use crate::parser::to_outline;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Render a laid-out map in the requested output format.
pub fn render(data: &MindMapData, format: OutputFormat) -> AppResult<String> {
    Ok(match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(data)?;
            json.push('\n');
            json
        }
        OutputFormat::Outline => to_outline(data),
    })
}

/// Parse a map previously written as JSON.
pub fn map_from_json(json: &str) -> AppResult<MindMapData> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a laid-out map from a JSON file.
pub fn load_map_json(path: &Path) -> AppResult<MindMapData> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Saves a laid-out map to a JSON file, replacing any previous content.
pub fn save_map_json(data: &MindMapData, path: &Path) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
