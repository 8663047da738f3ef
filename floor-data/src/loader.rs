use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use floor_core::{Product, ReferenceCatalog, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading reference data.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("duplicate product type '{0}'")]
    DuplicateProduct(String),

    #[error("duplicate state '{0}'")]
    DuplicateState(String),

    #[error("{field} for '{key}' must not be negative, got {value}")]
    NegativeRate {
        key: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("{0} file has a blank key")]
    BlankKey(&'static str),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the products file.
///
/// - `ProductType`: name customers pick, matched exactly
/// - `CostPerSquareFoot`: material cost per square foot
/// - `LaborCostPerSquareFoot`: labor cost per square foot
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    #[serde(rename = "ProductType")]
    pub product_type: String,
    #[serde(rename = "CostPerSquareFoot", deserialize_with = "deserialize_decimal")]
    pub cost_per_square_foot: Decimal,
    #[serde(rename = "LaborCostPerSquareFoot", deserialize_with = "deserialize_decimal")]
    pub labor_cost_per_square_foot: Decimal,
}

/// A single row of the tax rates file. `TaxRate` is a percentage.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateRecord {
    #[serde(rename = "State")]
    pub abbreviation: String,
    #[serde(rename = "StateName")]
    pub name: String,
    #[serde(rename = "TaxRate", deserialize_with = "deserialize_decimal")]
    pub tax_rate: Decimal,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product {
            product_type: record.product_type,
            cost_per_square_foot: record.cost_per_square_foot,
            labor_cost_per_square_foot: record.labor_cost_per_square_foot,
        }
    }
}

impl From<StateRecord> for State {
    fn from(record: StateRecord) -> Self {
        State {
            abbreviation: record.abbreviation,
            name: record.name,
            tax_rate: record.tax_rate,
        }
    }
}

// Read decimals from the raw text so the written scale is kept.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

/// Loader for the products and tax rates files.
///
/// Both files are delimited text with a header row. Rows are checked for
/// duplicate keys and negative rates before anything reaches the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogLoader {
    delimiter: u8,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CatalogLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn reader<R: Read>(
        &self,
        input: R,
    ) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input)
    }

    /// Parse product rows from any reader.
    pub fn parse_products<R: Read>(
        &self,
        input: R,
    ) -> Result<Vec<Product>, CatalogLoaderError> {
        let mut seen = BTreeSet::new();
        let mut products = Vec::new();

        for result in self.reader(input).deserialize() {
            let record: ProductRecord = result?;
            if record.product_type.is_empty() {
                return Err(CatalogLoaderError::BlankKey("products"));
            }
            if !seen.insert(record.product_type.clone()) {
                return Err(CatalogLoaderError::DuplicateProduct(record.product_type));
            }
            non_negative(
                &record.product_type,
                "CostPerSquareFoot",
                record.cost_per_square_foot,
            )?;
            non_negative(
                &record.product_type,
                "LaborCostPerSquareFoot",
                record.labor_cost_per_square_foot,
            )?;
            products.push(record.into());
        }

        Ok(products)
    }

    /// Parse state rows from any reader.
    pub fn parse_states<R: Read>(
        &self,
        input: R,
    ) -> Result<Vec<State>, CatalogLoaderError> {
        let mut seen = BTreeSet::new();
        let mut states = Vec::new();

        for result in self.reader(input).deserialize() {
            let record: StateRecord = result?;
            if record.abbreviation.is_empty() {
                return Err(CatalogLoaderError::BlankKey("states"));
            }
            if !seen.insert(record.abbreviation.clone()) {
                return Err(CatalogLoaderError::DuplicateState(record.abbreviation));
            }
            non_negative(&record.abbreviation, "TaxRate", record.tax_rate)?;
            states.push(record.into());
        }

        Ok(states)
    }

    /// Read both files and build the catalog.
    pub fn load(
        &self,
        products_path: &Path,
        states_path: &Path,
    ) -> Result<ReferenceCatalog, CatalogLoaderError> {
        let products = self.parse_products(open(products_path)?)?;
        let states = self.parse_states(open(states_path)?)?;
        info!(
            products = products.len(),
            states = states.len(),
            "reference data loaded"
        );
        Ok(ReferenceCatalog::new(products, states))
    }
}

fn open(path: &Path) -> Result<File, CatalogLoaderError> {
    File::open(path).map_err(|source| CatalogLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_negative(
    key: &str,
    field: &'static str,
    value: Decimal,
) -> Result<(), CatalogLoaderError> {
    if value < Decimal::ZERO {
        return Err(CatalogLoaderError::NegativeRate {
            key: key.to_string(),
            field,
            value,
        });
    }
    Ok(())
}
