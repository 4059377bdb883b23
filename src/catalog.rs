//! The fixed product catalog and garment sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Amount;

/// Errors raised when parsing catalog names from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown product '{0}'")]
    UnknownProduct(String),
    #[error("unknown size '{0}'")]
    UnknownSize(String),
}

/// A catalog entry. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "Hoodies")]
    Hoodies,
    #[serde(rename = "Quarter Zips")]
    QuarterZips,
    #[serde(rename = "T-shirts")]
    TShirts,
    #[serde(rename = "Polo Shirt")]
    PoloShirt,
    #[serde(rename = "Stickers")]
    Stickers,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::Hoodies,
        Product::QuarterZips,
        Product::TShirts,
        Product::PoloShirt,
        Product::Stickers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Product::Hoodies => "Hoodies",
            Product::QuarterZips => "Quarter Zips",
            Product::TShirts => "T-shirts",
            Product::PoloShirt => "Polo Shirt",
            Product::Stickers => "Stickers",
        }
    }

    pub fn price(self) -> Amount {
        match self {
            Product::Hoodies => Amount::from_cents(3523),
            Product::QuarterZips => Amount::from_cents(3137),
            Product::TShirts => Amount::from_cents(844),
            Product::PoloShirt => Amount::from_cents(1723),
            Product::Stickers => Amount::ZERO,
        }
    }

    /// Garments need one size per unit ordered.
    pub fn is_clothing(self) -> bool {
        !matches!(self, Product::Stickers)
    }

    pub fn is_free(self) -> bool {
        self.price().is_zero()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Product {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|product| product.name() == s)
            .ok_or_else(|| CatalogError::UnknownProduct(s.to_string()))
    }
}

/// Unit price for a product name; unknown names are priced at zero.
pub fn price_of(name: &str) -> Amount {
    name.parse::<Product>()
        .map(Product::price)
        .unwrap_or(Amount::ZERO)
}

/// Garment size offered for every clothing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::S, Size::M, Size::L, Size::XL, Size::XXL];

    pub fn as_str(self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Size {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownSize(s.to_string()))
    }
}
