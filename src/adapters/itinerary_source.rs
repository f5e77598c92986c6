use crate::domain::model::Itinerary;
use crate::utils::error::Result;
use crate::utils::validation::{file_extension, validate_file_extensions};
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "csv"];

/// Reads an itinerary snapshot exported as a JSON array or a CSV file with
/// an `id,title,tags,date` header.
pub async fn load_itineraries<P: AsRef<Path>>(path: P) -> Result<Vec<Itinerary>> {
    let path = path.as_ref();
    validate_file_extensions("itineraries", &[path], &SUPPORTED_EXTENSIONS)?;

    let content = tokio::fs::read(path).await?;
    let itineraries = match file_extension(path).as_deref() {
        Some("csv") => parse_csv(&content)?,
        _ => parse_json(&content)?,
    };

    tracing::debug!(
        "Loaded {} itineraries from {}",
        itineraries.len(),
        path.display()
    );
    Ok(itineraries)
}

pub fn parse_json(content: &[u8]) -> Result<Vec<Itinerary>> {
    Ok(serde_json::from_slice(content)?)
}

pub fn parse_csv(content: &[u8]) -> Result<Vec<Itinerary>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content);

    let mut itineraries = Vec::new();
    for record in reader.deserialize() {
        itineraries.push(record?);
    }
    Ok(itineraries)
}
