//! Property attribute record
//!
//! The 28 characteristics a user may enter by hand. Every field is a plain
//! string and may be empty; values are forwarded to the prediction service
//! exactly as entered; the service decides how to interpret them.
//!
//! Field identifiers and the record layout are generated from one table so
//! the enum, the wire keys and the struct fields can never drift apart.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of attributes in a record
pub const FIELD_COUNT: usize = 28;

macro_rules! attribute_fields {
    ($( $variant:ident => $field:ident : $key:literal ),* $(,)?) => {
        /// Identifier of one attribute, in wire order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AttributeField {
            $($variant),*
        }

        impl AttributeField {
            /// All fields in wire order
            pub const ALL: [AttributeField; FIELD_COUNT] = [$(AttributeField::$variant),*];

            /// Key used in the `/predict` request body
            pub const fn key(self) -> &'static str {
                match self {
                    $(AttributeField::$variant => $key),*
                }
            }
        }

        /// Full property description submitted in manual mode
        ///
        /// An all-empty record is valid input.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct AttributeRecord {
            $(
                #[serde(rename = $key)]
                $field: String,
            )*
        }

        impl AttributeRecord {
            /// Current value of one field (empty if never entered)
            pub fn get(&self, field: AttributeField) -> &str {
                match field {
                    $(AttributeField::$variant => &self.$field),*
                }
            }

            fn slot_mut(&mut self, field: AttributeField) -> &mut String {
                match field {
                    $(AttributeField::$variant => &mut self.$field),*
                }
            }
        }
    };
}

attribute_fields! {
    District => district: "District",
    Class => class: "Class",
    Building => building: "Building",
    FloorsTotal => floors_total: "FloorsTotal",
    Phase => phase: "Phase",
    BuildingType => building_type: "BuildingType",
    Floor => floor: "Floor",
    Section => section: "Section",
    PropertyType => property_type: "PropertyType",
    PropertyCategory => property_category: "PropertyCategory",
    Apartments => apartments: "Apartments",
    Finishing => finishing: "Finishing",
    Status => status: "Status",
    ApartmentOption => apartment_option: "ApartmentOption",
    Mortgage => mortgage: "Mortgage",
    Subsidies => subsidies: "Subsidies",
    Layout => layout: "Layout",
    CeilingHeight => ceiling_height: "CeilingHeight",
    TotalArea => total_area: "TotalArea",
    AreaWithoutBalcony => area_without_balcony: "AreaWithoutBalcony",
    LivingArea => living_area: "LivingArea",
    KitchenArea => kitchen_area: "KitchenArea",
    HallwayArea => hallway_area: "HallwayArea",
    BathroomArea => bathroom_area: "BathroomArea",
    BalconyArea => balcony_area: "BalconyArea",
    PlotArea => plot_area: "PlotArea",
    DeveloperEncoded => developer_encoded: "Developer_encoded",
    ComplexEncoded => complex_encoded: "Complex_encoded",
}

impl AttributeField {
    /// Parse a wire key (exact, case-sensitive match)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AttributeField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s).ok_or_else(|| Error::InvalidInput(format!("Unknown attribute: {}", s)))
    }
}

impl AttributeRecord {
    /// Create an all-empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field, leaving all others untouched
    ///
    /// This is the only mutation entry point.
    pub fn set(&mut self, field: AttributeField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Full mapping in wire order
    pub fn entries(&self) -> impl Iterator<Item = (AttributeField, &str)> + '_ {
        AttributeField::ALL
            .iter()
            .map(move |&field| (field, self.get(field)))
    }

    /// Number of fields holding a non-empty value
    pub fn filled_count(&self) -> usize {
        self.entries().filter(|(_, value)| !value.is_empty()).count()
    }

    /// True if no field has been entered
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}
