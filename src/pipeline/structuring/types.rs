use serde::Serialize;

use super::ExtractionError;

/// Which output schema a request is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// camelCase record with parallel medication arrays.
    Legacy,
    /// Mixed-case record with split vital-sign units and a prescription block.
    Current,
}

/// A normalized record of either variant. Serializes as the bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedRecord {
    Legacy(LegacyPatientRecord),
    Current(PatientRecord),
}

impl ExtractedRecord {
    pub fn variant(&self) -> SchemaVariant {
        match self {
            ExtractedRecord::Legacy(_) => SchemaVariant::Legacy,
            ExtractedRecord::Current(_) => SchemaVariant::Current,
        }
    }
}

// ───────────────────────────────────────────────
// Legacy schema
// ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPatientRecord {
    pub symptoms: Option<String>,
    pub diagnosis: Vec<String>,
    pub treatment: Option<String>,
    pub exercise: Option<String>,
    pub diet: Option<String>,
    pub mind_set: Option<String>,
    pub follow_ups: Vec<String>,
    pub books: Vec<String>,
    pub sleep_from: Option<String>,
    pub sleep_to: Option<String>,
    pub appointment: Option<String>,

    pub supplement_list: Vec<SupplementEntry>,
    /// Flat supplement names. Passed through from the model, never derived.
    pub supplement_name: Vec<Option<String>>,

    pub blood_pressure: Option<String>,
    pub blood_pressure_unit: Option<String>,
    pub body_temperature: Option<String>,
    pub body_temperature_unit: Option<String>,
    pub body_heart_rate: Option<String>,
    pub body_heart_rate_unit: Option<String>,
    pub respiratory_rate: Option<String>,
    pub weight_kg: Option<String>,
    pub bmi: Option<String>,

    pub medication_list: Vec<MedicationEntry>,

    // Column-aligned views over `medication_list`.
    pub medication_name: Vec<Option<String>>,
    pub dosage: Vec<Option<String>>,
    pub frequency: Vec<Option<String>>,
    pub remarks: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationEntry {
    pub medication_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementEntry {
    pub supplement_name: Option<String>,
}

// ───────────────────────────────────────────────
// Current schema
// ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientRecord {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub symptoms: Option<String>,

    pub diagnosis: Vec<String>,
    pub medications: Vec<MedicationItem>,

    pub treatment: Option<String>,
    pub exercise: Option<String>,
    pub diet: Option<String>,

    #[serde(rename = "mindSet")]
    pub mind_set: Vec<String>,
    #[serde(rename = "followUps")]
    pub follow_ups: Vec<String>,
    pub books: Vec<String>,

    #[serde(rename = "sleepFrom")]
    pub sleep_from: Option<String>,
    #[serde(rename = "sleepTo")]
    pub sleep_to: Option<String>,
    pub appointment: Option<String>,

    #[serde(rename = "supplementList")]
    pub supplement_list: Vec<SupplementEntry>,

    pub blood_pressure: Option<String>,
    pub blood_pressure_unit: String,
    #[serde(rename = "body_heartRate")]
    pub body_heart_rate: Option<String>,
    #[serde(rename = "body_heartRate_unit")]
    pub body_heart_rate_unit: String,
    pub weight_kg: Option<String>,
    pub weight_kg_unit: String,

    pub hba1c_percent: Option<String>,
    pub bsl_fasting: Option<String>,
    pub bsl_postprandial: Option<String>,
    pub bsl_random: Option<String>,
    pub insulin_fasting: Option<String>,
    pub insulin_postprandial: Option<String>,
    pub tsh_level: Option<String>,
    pub c_peptide_fasting: Option<String>,
    pub c_peptide_postprandial: Option<String>,
    pub creatinine_level: Option<String>,

    pub prescription: Prescription,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MedicationItem {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub medication_list: Vec<PrescribedMedication>,
    /// Set by the document store once a prescription file exists; always null here.
    pub file_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescribedMedication {
    pub medication_name: String,
}

/// Generative model client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, ExtractionError>;
}
