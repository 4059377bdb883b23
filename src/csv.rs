use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::catalog::{CatalogError, Product, Size};
use crate::session::ShopEvent;

/// Largest quantity a script may set for one product.
pub const MAX_QUANTITY: u32 = 999;

/// Errors that can occur when reading a shop event script
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open '{path}': {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing {field}")]
    MissingField {
        line: usize,
        action: String,
        field: &'static str,
    },

    #[error("line {line}: invalid quantity '{value}'")]
    InvalidQuantity { line: usize, value: String },

    #[error("line {line}: quantity {quantity} exceeds the limit of {max}", max = MAX_QUANTITY)]
    QuantityTooLarge { line: usize, quantity: u32 },

    #[error("line {line}: {source}")]
    Catalog { line: usize, source: CatalogError },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    action: String,
    product: Option<String>,
    index: Option<usize>,
    value: Option<String>,
}

impl InputRow {
    fn product(&self, line: usize) -> Result<Product, CsvError> {
        let name = self.product.as_deref().ok_or_else(|| self.missing(line, "product"))?;
        name.parse::<Product>()
            .map_err(|source| CsvError::Catalog { line, source })
    }

    fn value(&self, line: usize) -> Result<String, CsvError> {
        self.value.clone().ok_or_else(|| self.missing(line, "value"))
    }

    fn missing(&self, line: usize, field: &'static str) -> CsvError {
        CsvError::MissingField {
            line,
            action: self.action.clone(),
            field,
        }
    }

    fn into_event(self, line: usize) -> Result<ShopEvent, CsvError> {
        match self.action.as_str() {
            "quantity" => {
                let product = self.product(line)?;
                let value = self.value(line)?;
                let quantity: u32 = value
                    .parse()
                    .map_err(|_| CsvError::InvalidQuantity { line, value })?;
                if quantity > MAX_QUANTITY {
                    return Err(CsvError::QuantityTooLarge { line, quantity });
                }
                Ok(ShopEvent::SetQuantity { product, quantity })
            }
            "increment" => Ok(ShopEvent::Increment(self.product(line)?)),
            "decrement" => Ok(ShopEvent::Decrement(self.product(line)?)),
            "size" => {
                let product = self.product(line)?;
                let index = self.index.ok_or_else(|| self.missing(line, "index"))?;
                let size: Size = self
                    .value(line)?
                    .parse()
                    .map_err(|source| CsvError::Catalog { line, source })?;
                Ok(ShopEvent::SetSize {
                    product,
                    index,
                    size,
                })
            }
            "customer_name" => Ok(ShopEvent::SetName(self.value(line)?)),
            "customer_email" => {
                let email = self.value(line)?;
                if !email.contains('@') {
                    warn!(line, email, "customer email does not look like an address");
                }
                Ok(ShopEvent::SetEmail(email))
            }
            "notes" => Ok(ShopEvent::SetNotes(self.value.unwrap_or_default())),
            "submit" => Ok(ShopEvent::Submit),
            "start_over" => Ok(ShopEvent::StartOver),
            other => Err(CsvError::UnrecognizedAction {
                line,
                action: other.to_string(),
            }),
        }
    }
}

/// Read shop events from a csv file with columns `action,product,index,value`
pub fn read_events(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<ShopEvent, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            row.into_event(line)
        }))
}
