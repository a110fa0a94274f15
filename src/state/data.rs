/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the record store, the session and the UI layer.
use serde::{Deserialize, Serialize};

/// One saved annotation, exactly as it appears as a row in the record store.
///
/// Rows have no stable id: a record is identified by its position in the
/// store, so deleting row N shifts every later row down by one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Dosage")]
    pub dosage: String,
    #[serde(rename = "Ingredient")]
    pub ingredient: String,
    #[serde(rename = "Type")]
    pub drug_type: String,
    #[serde(rename = "Effects")]
    pub effects: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl AnnotationRecord {
    /// Column names in the order they are written to the header row
    pub const COLUMNS: [&'static str; 6] =
        ["Name", "Dosage", "Ingredient", "Type", "Effects", "Notes"];

    /// Build a record for `name` from the fields the user typed
    pub fn from_fields(name: impl Into<String>, fields: &AnnotationFields) -> Self {
        Self {
            name: name.into(),
            dosage: fields.dosage.clone(),
            ingredient: fields.ingredient.clone(),
            drug_type: fields.drug_type.clone(),
            effects: fields.effects.clone(),
            notes: fields.notes.clone(),
        }
    }

    /// Cell values in column order
    pub fn values(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.dosage.as_str(),
            self.ingredient.as_str(),
            self.drug_type.as_str(),
            self.effects.as_str(),
            self.notes.as_str(),
        ]
    }
}

/// The user-editable part of an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationFields {
    pub dosage: String,
    pub ingredient: String,
    pub drug_type: String,
    pub effects: String,
    pub notes: String,
}

impl AnnotationFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Dosage => &self.dosage,
            Field::Ingredient => &self.ingredient,
            Field::DrugType => &self.drug_type,
            Field::Effects => &self.effects,
            Field::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Dosage => self.dosage = value,
            Field::Ingredient => self.ingredient = value,
            Field::DrugType => self.drug_type = value,
            Field::Effects => self.effects = value,
            Field::Notes => self.notes = value,
        }
    }
}

/// Identifies one input of the annotation form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dosage,
    Ingredient,
    DrugType,
    Effects,
    Notes,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Dosage,
        Field::Ingredient,
        Field::DrugType,
        Field::Effects,
        Field::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Dosage => "Dosage (mg)",
            Field::Ingredient => "Active Ingredient(s)",
            Field::DrugType => "Drug Type",
            Field::Effects => "Side Effects",
            Field::Notes => "Notes",
        }
    }

    /// Example value shown in the empty input
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Dosage => "e.g. 500mg",
            Field::Ingredient => "e.g. Paracetamol",
            Field::DrugType => "e.g. Antibiotic, Vitamin",
            Field::Effects => "e.g. dizziness",
            Field::Notes => "Any relevant notes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_copies_every_field() {
        let fields = AnnotationFields {
            dosage: "500mg".into(),
            ingredient: "Paracetamol".into(),
            drug_type: "Analgesic".into(),
            effects: "Nausea".into(),
            notes: String::new(),
        };

        let record = AnnotationRecord::from_fields("Paracetamol", &fields);

        assert_eq!(
            record.values(),
            ["Paracetamol", "500mg", "Paracetamol", "Analgesic", "Nausea", ""]
        );
    }

    #[test]
    fn test_set_and_get_field() {
        let mut fields = AnnotationFields::default();
        for field in Field::ALL {
            fields.set(field, field.label().to_string());
        }
        for field in Field::ALL {
            assert_eq!(fields.get(field), field.label());
        }
    }
}
