use crate::family::{FamilyError, Individual, Population};
use csv;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column positions of the fields a family record needs.
struct Columns {
    name: usize,
    mother: usize,
    father: usize,
    has_trait: usize,
}

/// Reads a `Population` from delimited text with a header row
///
/// Each row describes one individual: their name, their mother and father
/// (both blank or both set) and whether they show the trait (blank when
/// unobserved). The loaded population is validated before it is returned.
pub struct CsvBuilder {
    delimiter: u8,
    name_field: String,
    mother_field: String,
    father_field: String,
    trait_field: String,
    true_marker: String,
    false_marker: String,
}

impl Default for CsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvBuilder {
    /// Construct a new Csv builder
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            name_field: "name".to_owned(),
            mother_field: "mother".to_owned(),
            father_field: "father".to_owned(),
            trait_field: "trait".to_owned(),
            true_marker: "1".to_owned(),
            false_marker: "0".to_owned(),
        }
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn name_field(&mut self, name_field: &str) -> &mut Self {
        self.name_field = name_field.to_owned();
        self
    }

    pub fn parent_fields(&mut self, mother_field: &str, father_field: &str) -> &mut Self {
        self.mother_field = mother_field.to_owned();
        self.father_field = father_field.to_owned();
        self
    }

    pub fn trait_field(&mut self, trait_field: &str) -> &mut Self {
        self.trait_field = trait_field.to_owned();
        self
    }

    /// Cell values meaning "shows the trait" and "does not show the trait".
    pub fn trait_markers(&mut self, true_marker: &str, false_marker: &str) -> &mut Self {
        self.true_marker = true_marker.to_owned();
        self.false_marker = false_marker.to_owned();
        self
    }

    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Population, FamilyError> {
        let file = File::open(path.as_ref())?;
        self.from_reader(Box::new(file))
    }

    pub fn from_reader(&self, reader: Box<dyn Read>) -> Result<Population, FamilyError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = {
            let headers = rdr.headers()?;
            let find = |field: &str| {
                headers
                    .iter()
                    .position(|header| header == field)
                    .ok_or_else(|| FamilyError::MissingColumn(field.to_owned()))
            };
            Columns {
                name: find(&self.name_field)?,
                mother: find(&self.mother_field)?,
                father: find(&self.father_field)?,
                has_trait: find(&self.trait_field)?,
            }
        };

        let mut population = Population::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let cell = |column: usize| record.get(column).filter(|value| !value.is_empty());
            let has_trait = self.parse_trait(idx + 1, cell(columns.has_trait))?;
            let individual = Individual::new(
                cell(columns.name).unwrap_or_default(),
                cell(columns.mother),
                cell(columns.father),
            )
            .with_trait(has_trait);
            population.insert(individual)?;
        }

        population.validate()?;
        debug!(individuals = population.len(), "loaded family");
        Ok(population)
    }

    fn parse_trait(&self, row: usize, marker: Option<&str>) -> Result<Option<bool>, FamilyError> {
        match marker {
            None => Ok(None),
            Some(marker) if marker == self.true_marker => Ok(Some(true)),
            Some(marker) if marker == self.false_marker => Ok(Some(false)),
            Some(marker) => Err(FamilyError::UnknownTraitMarker {
                row,
                marker: marker.to_owned(),
            }),
        }
    }
}
