//! # Building stock
//!
//! Row-oriented snapshot of the dwellings under study. A `BuildingStock` owns
//! its records; every transformation returns a fresh stock, so pre- and
//! post-retrofit snapshots never share storage.

use super::rating::{classify_rating, BerBand};
use super::types::{FabricComponent, FabricElement};
use crate::error::{Result, RetrofitError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Read;
use strum::IntoEnumIterator;

/// Columns every stock record must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "small_area",
    "year_of_construction",
    "energy_value",
    "roof_area",
    "roof_uvalue",
    "wall_area",
    "wall_uvalue",
    "floor_area",
    "floor_uvalue",
    "window_area",
    "window_uvalue",
    "door_area",
    "door_uvalue",
    "ground_floor_area",
    "first_floor_area",
    "second_floor_area",
    "third_floor_area",
];

const STOREY_COLUMNS: [&str; 4] = [
    "ground_floor_area",
    "first_floor_area",
    "second_floor_area",
    "third_floor_area",
];

/// One dwelling. Identity is its position in the stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dwelling {
    /// Census small area the dwelling belongs to (not unique per dwelling)
    pub small_area: String,
    pub year_of_construction: i32,
    /// BER energy value (kWh/m²/yr)
    pub energy_value: f64,
    pub roof: FabricElement,
    pub wall: FabricElement,
    pub floor: FabricElement,
    pub window: FabricElement,
    pub door: FabricElement,
    /// Floor area by storey, ground first (m²)
    pub storey_floor_areas: [f64; 4],
}

impl Dwelling {
    pub fn element(&self, component: FabricComponent) -> &FabricElement {
        match component {
            FabricComponent::Roof => &self.roof,
            FabricComponent::Wall => &self.wall,
            FabricComponent::Floor => &self.floor,
            FabricComponent::Window => &self.window,
            FabricComponent::Door => &self.door,
        }
    }

    fn element_mut(&mut self, component: FabricComponent) -> &mut FabricElement {
        match component {
            FabricComponent::Roof => &mut self.roof,
            FabricComponent::Wall => &mut self.wall,
            FabricComponent::Floor => &mut self.floor,
            FabricComponent::Window => &mut self.window,
            FabricComponent::Door => &mut self.door,
        }
    }

    /// Sum of the four storey floor areas (m²)
    pub fn total_floor_area(&self) -> f64 {
        self.storey_floor_areas.iter().sum()
    }

    fn from_record(row: usize, record: &Map<String, Value>) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !record.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RetrofitError::Schema {
                missing,
                row: Some(row),
            });
        }

        let small_area = match &record["small_area"] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(non_numeric(row, "small_area")),
        };
        let number = |column: &str| -> Result<f64> {
            record[column]
                .as_f64()
                .ok_or_else(|| non_numeric(row, column))
        };
        let element = |component: FabricComponent| -> Result<FabricElement> {
            Ok(FabricElement::new(
                number(component.area_column())?,
                number(component.uvalue_column())?,
            ))
        };

        let year = number("year_of_construction")?;
        if year.fract() != 0.0 {
            return Err(non_numeric(row, "year_of_construction"));
        }

        let mut storey_floor_areas = [0.0; 4];
        for (slot, column) in storey_floor_areas.iter_mut().zip(STOREY_COLUMNS) {
            *slot = number(column)?;
        }

        Ok(Self {
            small_area,
            year_of_construction: year as i32,
            energy_value: number("energy_value")?,
            roof: element(FabricComponent::Roof)?,
            wall: element(FabricComponent::Wall)?,
            floor: element(FabricComponent::Floor)?,
            window: element(FabricComponent::Window)?,
            door: element(FabricComponent::Door)?,
            storey_floor_areas,
        })
    }

    fn validate(&self, row: usize) -> Result<()> {
        if !self.energy_value.is_finite() {
            return Err(RetrofitError::validation_at(
                "stock",
                row,
                "energy_value must be finite",
            ));
        }
        for component in FabricComponent::iter() {
            let element = self.element(component);
            if !(element.area.is_finite() && element.area >= 0.0) {
                return Err(RetrofitError::validation_at(
                    component.to_string(),
                    row,
                    format!("{} must be >= 0, got {}", component.area_column(), element.area),
                ));
            }
            if !(element.uvalue.is_finite() && element.uvalue > 0.0) {
                return Err(RetrofitError::validation_at(
                    component.to_string(),
                    row,
                    format!("{} must be > 0, got {}", component.uvalue_column(), element.uvalue),
                ));
            }
        }
        for (area, column) in self.storey_floor_areas.iter().zip(STOREY_COLUMNS) {
            if !(area.is_finite() && *area >= 0.0) {
                return Err(RetrofitError::validation_at(
                    "stock",
                    row,
                    format!("{} must be >= 0, got {}", column, area),
                ));
            }
        }
        Ok(())
    }
}

fn non_numeric(row: usize, column: &str) -> RetrofitError {
    RetrofitError::Schema {
        missing: vec![column.to_string()],
        row: Some(row),
    }
}

/// Ordered collection of dwellings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildingStock {
    dwellings: Vec<Dwelling>,
}

impl BuildingStock {
    /// Build a stock, checking areas are non-negative and U-values positive
    pub fn new(dwellings: Vec<Dwelling>) -> Result<Self> {
        for (row, dwelling) in dwellings.iter().enumerate() {
            dwelling.validate(row)?;
        }
        Ok(Self { dwellings })
    }

    /// Parse a JSON array of records (one object per dwelling).
    ///
    /// Fails fast with a schema error naming the missing columns of the first
    /// incomplete record.
    pub fn from_json_records(value: &Value) -> Result<Self> {
        let records = value.as_array().ok_or_else(|| {
            RetrofitError::validation("stock", "expected a JSON array of dwelling records")
        })?;

        let dwellings = records
            .iter()
            .enumerate()
            .map(|(row, record)| match record.as_object() {
                Some(object) => Dwelling::from_record(row, object),
                None => Err(RetrofitError::Schema {
                    missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                    row: Some(row),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(dwellings)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| RetrofitError::validation("stock", e.to_string()))?;
        Self::from_json_records(&value)
    }

    pub fn len(&self) -> usize {
        self.dwellings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dwellings.is_empty()
    }

    pub fn dwellings(&self) -> &[Dwelling] {
        &self.dwellings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dwelling> {
        self.dwellings.iter()
    }

    /// U-value column of one component, in stock order
    pub fn uvalues(&self, component: FabricComponent) -> Vec<f64> {
        self.dwellings
            .iter()
            .map(|d| d.element(component).uvalue)
            .collect()
    }

    /// Area column of one component, in stock order
    pub fn areas(&self, component: FabricComponent) -> Vec<f64> {
        self.dwellings
            .iter()
            .map(|d| d.element(component).area)
            .collect()
    }

    pub fn energy_values(&self) -> Vec<f64> {
        self.dwellings.iter().map(|d| d.energy_value).collect()
    }

    pub fn total_floor_areas(&self) -> Vec<f64> {
        self.dwellings.iter().map(Dwelling::total_floor_area).collect()
    }

    /// Copy of this stock with one component's U-value column replaced
    pub fn with_uvalues(&self, component: FabricComponent, uvalues: &[f64]) -> Result<Self> {
        self.check_len(component.uvalue_column(), uvalues.len())?;
        let mut next = self.clone();
        for (row, (dwelling, uvalue)) in next.dwellings.iter_mut().zip(uvalues).enumerate() {
            if !(uvalue.is_finite() && *uvalue > 0.0) {
                return Err(RetrofitError::validation_at(
                    component.to_string(),
                    row,
                    format!("{} must be > 0, got {}", component.uvalue_column(), uvalue),
                ));
            }
            dwelling.element_mut(component).uvalue = *uvalue;
        }
        Ok(next)
    }

    /// Copy of this stock with the energy value column replaced
    pub fn with_energy_values(&self, energy_values: &[f64]) -> Result<Self> {
        self.check_len("energy_value", energy_values.len())?;
        let mut next = self.clone();
        for (dwelling, value) in next.dwellings.iter_mut().zip(energy_values) {
            dwelling.energy_value = *value;
        }
        Ok(next)
    }

    /// Keep dwellings whose rating falls in `band`; `None` keeps everything
    pub fn filter_by_band(&self, band: Option<BerBand>) -> Self {
        match band {
            None => self.clone(),
            Some(band) => self.filtered(|d| classify_rating(d.energy_value).band() == band),
        }
    }

    /// Keep dwellings in any of the listed small areas; an empty list keeps everything
    pub fn filter_by_small_areas(&self, small_areas: &[String]) -> Self {
        if small_areas.is_empty() {
            return self.clone();
        }
        let wanted: HashSet<&str> = small_areas.iter().map(String::as_str).collect();
        self.filtered(|d| wanted.contains(d.small_area.as_str()))
    }

    fn filtered(&self, keep: impl Fn(&Dwelling) -> bool) -> Self {
        Self {
            dwellings: self.dwellings.iter().filter(|&d| keep(d)).cloned().collect(),
        }
    }

    fn check_len(&self, column: &str, len: usize) -> Result<()> {
        if len != self.len() {
            return Err(RetrofitError::validation(
                column,
                format!("expected {} values, got {}", self.len(), len),
            ));
        }
        Ok(())
    }
}
