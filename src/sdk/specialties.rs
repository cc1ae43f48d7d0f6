use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};

use super::hospitals::DatasetError;

/// The list of selectable specialties, in file order.
#[derive(Debug, Clone, Default)]
pub struct SpecialtyCatalog {
    names: Vec<String>,
}

impl SpecialtyCatalog {
    /// Reads a one-column CSV file with a `name` header.
    pub fn new<P: AsRef<Path>>(csv_path: P) -> Result<Self, DatasetError> {
        let file = File::open(csv_path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .from_reader(reader);

        let mut names: Vec<String> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let Some(name) = record.get(0).map(str::trim) else {
                continue;
            };
            if name.is_empty() || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(name.to_string());
        }

        Ok(SpecialtyCatalog { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Case-insensitive lookup returning the catalog's spelling.
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.names
            .iter()
            .find(|n| n.to_lowercase() == wanted)
            .map(String::as_str)
    }
}
