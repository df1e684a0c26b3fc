use anyhow::{anyhow, Result};

use crate::models::Property;

pub const STUDIO: &str = "studio";
pub const SHARED: &str = "shared";
pub const RENT_MIN: &str = "rent-min";
pub const RENT_MAX: &str = "rent-max";
pub const BEDROOMS_MIN: &str = "bedrooms-min";
pub const BEDROOMS_MAX: &str = "bedrooms-max";

pub const FIELDS: [&str; 6] = [STUDIO, SHARED, RENT_MIN, RENT_MAX, BEDROOMS_MIN, BEDROOMS_MAX];

/// Current state of the filter form, exactly as entered.
///
/// Range fields hold raw text; they are only interpreted when a render asks
/// for [`FilterCriteria`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    studio: bool,
    shared: bool,
    rent_min: String,
    rent_max: String,
    bedrooms_min: String,
    bedrooms_max: String,
}

impl FilterForm {
    pub fn studio(&self) -> bool {
        self.studio
    }

    pub fn shared(&self) -> bool {
        self.shared
    }

    pub fn rent_min(&self) -> &str {
        &self.rent_min
    }

    pub fn rent_max(&self) -> &str {
        &self.rent_max
    }

    pub fn bedrooms_min(&self) -> &str {
        &self.bedrooms_min
    }

    pub fn bedrooms_max(&self) -> &str {
        &self.bedrooms_max
    }

    pub fn set_studio(&mut self, checked: bool) -> &mut Self {
        self.studio = checked;
        self
    }

    pub fn set_shared(&mut self, checked: bool) -> &mut Self {
        self.shared = checked;
        self
    }

    pub fn set_rent_range(&mut self, min: &str, max: &str) -> &mut Self {
        self.rent_min = min.to_string();
        self.rent_max = max.to_string();
        self
    }

    pub fn set_bedrooms_range(&mut self, min: &str, max: &str) -> &mut Self {
        self.bedrooms_min = min.to_string();
        self.bedrooms_max = max.to_string();
        self
    }

    /// Sets a field by its form name (`studio`, `rent-min`, ...).
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            STUDIO => self.studio = parse_checkbox(field, value)?,
            SHARED => self.shared = parse_checkbox(field, value)?,
            RENT_MIN => self.rent_min = value.to_string(),
            RENT_MAX => self.rent_max = value.to_string(),
            BEDROOMS_MIN => self.bedrooms_min = value.to_string(),
            BEDROOMS_MAX => self.bedrooms_max = value.to_string(),
            _ => {
                return Err(anyhow!(
                    "unknown filter field '{}', expected one of: {}",
                    field,
                    FIELDS.join(", ")
                ))
            }
        }
        Ok(())
    }

    /// A copy of the form with every `(field, value)` applied, or the first
    /// error. `self` is never touched.
    pub fn with_fields(&self, fields: &[(String, String)]) -> Result<FilterForm> {
        let mut edited = self.clone();
        for (field, value) in fields {
            edited.set(field, value)?;
        }
        Ok(edited)
    }
}

fn parse_checkbox(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" | "checked" => Ok(true),
        "off" | "false" | "no" | "0" | "unchecked" => Ok(false),
        other => Err(anyhow!("{field} expects on/off, got '{other}'")),
    }
}

/// Inclusive numeric range; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn parse(min_field: &str, min: &str, max_field: &str, max: &str) -> Result<NumericRange> {
        Ok(NumericRange {
            min: parse_bound(min_field, min)?,
            max: parse_bound(max_field, max)?,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

fn parse_bound(field: &str, text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(anyhow!("{field} must be a number, got '{text}'")),
    }
}

/// Filter values parsed from a [`FilterForm`], built once per render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub studio: bool,
    pub shared: bool,
    pub price: NumericRange,
    pub bedrooms: NumericRange,
}

impl FilterCriteria {
    pub fn from_form(form: &FilterForm) -> Result<FilterCriteria> {
        Ok(FilterCriteria {
            studio: form.studio(),
            shared: form.shared(),
            price: NumericRange::parse(RENT_MIN, form.rent_min(), RENT_MAX, form.rent_max())?,
            bedrooms: NumericRange::parse(
                BEDROOMS_MIN,
                form.bedrooms_min(),
                BEDROOMS_MAX,
                form.bedrooms_max(),
            )?,
        })
    }

    pub fn matches(&self, property: &Property) -> bool {
        property.studio == self.studio
            && property.shared == self.shared
            && self.price.contains(property.price as f64)
            && self.bedrooms.contains(property.bedrooms as f64)
    }

    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }
}
