//! Delimited record format shared by order partitions and the export file.
//!
//! Records are plain delimiter-joined text with no quoting. The customer
//! name is the only field allowed to contain the delimiter: on write every
//! delimiter in it is swapped for the substitute character, and on read the
//! substitute is swapped back. A name that already contains the substitute
//! would not survive that round trip, so [`RecordFormat::accepts_name`]
//! rejects it up front.

use std::io::{Read, Write};

use floor_core::StoreError;

/// Column names of a per-date order file, in record order.
pub const ORDER_COLUMNS: [&str; 12] = [
    "OrderNumber",
    "CustomerName",
    "State",
    "TaxRate",
    "ProductType",
    "Area",
    "CostPerSquareFoot",
    "LaborCostPerSquareFoot",
    "MaterialCost",
    "LaborCost",
    "Tax",
    "Total",
];

/// Extra trailing column of the consolidated export file.
pub const EXPORT_DATE_COLUMN: &str = "OrderDate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormat {
    delimiter: u8,
    substitute: u8,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            substitute: b'/',
        }
    }
}

impl RecordFormat {
    /// # Errors
    /// [`StoreError::InvalidFormat`] when either character is not ASCII,
    /// could appear inside a number, is a line break, or when both are the
    /// same.
    pub fn new(
        delimiter: char,
        substitute: char,
    ) -> Result<Self, StoreError> {
        let delimiter = usable_byte("delimiter", delimiter)?;
        let substitute = usable_byte("substitute", substitute)?;
        if delimiter == substitute {
            return Err(StoreError::InvalidFormat(format!(
                "delimiter and substitute must differ, both are '{}'",
                delimiter as char
            )));
        }
        Ok(Self {
            delimiter,
            substitute,
        })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    pub fn substitute(&self) -> char {
        self.substitute as char
    }

    /// Customer name as written to disk.
    pub fn escape_name(
        &self,
        name: &str,
    ) -> String {
        name.replace(self.delimiter(), &self.substitute().to_string())
    }

    /// Exact inverse of [`RecordFormat::escape_name`] for every name that
    /// [`RecordFormat::accepts_name`] allows.
    pub fn unescape_name(
        &self,
        stored: &str,
    ) -> String {
        stored.replace(self.substitute(), &self.delimiter().to_string())
    }

    /// Whether `name` round-trips through escape/unescape unchanged.
    pub fn accepts_name(
        &self,
        name: &str,
    ) -> bool {
        !name.contains(self.substitute()) && !name.contains(['\n', '\r'])
    }

    /// True when a field other than the customer name can be written as is.
    pub fn is_safe_field(
        &self,
        value: &str,
    ) -> bool {
        !value.contains(self.delimiter()) && !value.contains(['\n', '\r'])
    }

    pub(crate) fn reader<R: Read>(
        &self,
        input: R,
    ) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .quoting(false)
            .flexible(false)
            .from_reader(input)
    }

    pub(crate) fn writer<W: Write>(
        &self,
        output: W,
    ) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(output)
    }
}

fn usable_byte(
    role: &str,
    c: char,
) -> Result<u8, StoreError> {
    let reserved = c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '\n' | '\r');
    if !c.is_ascii() || reserved {
        return Err(StoreError::InvalidFormat(format!(
            "{role} {c:?} cannot be used in order records"
        )));
    }
    Ok(c as u8)
}
