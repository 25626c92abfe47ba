//! Everyday equivalents of a flight's emissions
//!
//! Each resource converts kilograms of CO2 into something easier to picture:
//! kilometres driven, kilograms of coal, trees grown. Rates are per kg CO2.

use serde::Serialize;

/// A resource a CO2 total can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resource {
    /// Units of the resource per kg of CO2
    pub rate: f64,
    /// Short unit shown next to the value, if any
    pub unit: Option<&'static str>,
    pub message: &'static str,
}

pub const CAR_KM: Resource = Resource {
    rate: 8.620689655,
    unit: Some("km"),
    message: "Driven by an average new passenger car",
};

pub const COAL_KG: Resource = Resource {
    rate: 1.962114133,
    unit: Some("kg"),
    message: "Of coal burned",
};

pub const SMARTPHONES_CHARGED: Resource = Resource {
    rate: 121.654501216545,
    unit: None,
    message: "Smartphones charged",
};

pub const BAGS_RECYCLED: Resource = Resource {
    rate: 0.043290043,
    unit: None,
    message: "Bags of household waste recycled instead of dumped",
};

pub const TREES_GROWN: Resource = Resource {
    rate: 0.016666667,
    unit: None,
    message: "Tree seedlings grown for 10 years",
};

/// What the emissions are equivalent to
pub const EMISSIONS: [Resource; 3] = [CAR_KM, COAL_KG, SMARTPHONES_CHARGED];

/// What it would take to offset the emissions
pub const OFFSETS: [Resource; 2] = [BAGS_RECYCLED, TREES_GROWN];

/// A total converted into one resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equivalent {
    pub resource: Resource,
    pub value: f64,
}

impl std::fmt::Display for Equivalent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resource.unit {
            Some(unit) => write!(f, "{:.1} {} {}", self.value, unit, self.resource.message),
            None => write!(f, "{:.1} {}", self.value, self.resource.message),
        }
    }
}

/// Convert `emissions_total` (kg CO2) through every resource of `table`
///
/// Nothing is shown for an empty result, so a zero total gives no rows.
pub fn equivalents_for(emissions_total: f64, table: &[Resource]) -> Vec<Equivalent> {
    if emissions_total <= 0.0 {
        return Vec::new();
    }

    table
        .iter()
        .map(|resource| Equivalent {
            resource: *resource,
            value: emissions_total * resource.rate,
        })
        .collect()
}
