//! Schema completion: turns the model's loosely-shaped JSON object into a
//! complete record, field by field.
//!
//! Every schema key is read explicitly from the parsed object; absent or null
//! values fall back to empty defaults and keys outside the schema are dropped.

use serde_json::{Map, Value};

use super::parser::{
    age_field, aligned_list_field, coerce_text, object_list_field, text_field, text_list_field,
};
use super::types::{
    LegacyPatientRecord, MedicationEntry, MedicationItem, PatientRecord, PrescribedMedication,
    Prescription, SupplementEntry,
};
use super::units::{
    split_value_and_unit, SplitMeasurement, BLOOD_PRESSURE_UNIT, HEART_RATE_UNIT, WEIGHT_UNIT,
};

/// Complete a legacy-schema record.
///
/// When the model filled `medicationList` but left `medicationName` empty,
/// the four parallel arrays are rebuilt from the list, in order. The arrays
/// are never used to rebuild the list.
pub fn complete_legacy(data: &Map<String, Value>) -> LegacyPatientRecord {
    let medication_list: Vec<MedicationEntry> = object_list_field(data, "medicationList")
        .into_iter()
        .map(|m| MedicationEntry {
            medication_name: text_field(m, "medicationName"),
            dosage: text_field(m, "dosage"),
            frequency: text_field(m, "frequency"),
            remarks: text_field(m, "remarks"),
        })
        .collect();

    let mut medication_name = aligned_list_field(data, "medicationName");
    let mut dosage = aligned_list_field(data, "dosage");
    let mut frequency = aligned_list_field(data, "frequency");
    let mut remarks = aligned_list_field(data, "remarks");

    if !medication_list.is_empty() && medication_name.is_empty() {
        tracing::debug!(
            medications = medication_list.len(),
            "Deriving parallel medication arrays from medicationList"
        );
        medication_name = medication_list.iter().map(|m| m.medication_name.clone()).collect();
        dosage = medication_list.iter().map(|m| m.dosage.clone()).collect();
        frequency = medication_list.iter().map(|m| m.frequency.clone()).collect();
        remarks = medication_list.iter().map(|m| m.remarks.clone()).collect();
    }

    LegacyPatientRecord {
        symptoms: text_field(data, "symptoms"),
        diagnosis: text_list_field(data, "diagnosis"),
        treatment: text_field(data, "treatment"),
        exercise: text_field(data, "exercise"),
        diet: text_field(data, "diet"),
        mind_set: text_field(data, "mindSet"),
        follow_ups: text_list_field(data, "followUps"),
        books: text_list_field(data, "books"),
        sleep_from: text_field(data, "sleepFrom"),
        sleep_to: text_field(data, "sleepTo"),
        appointment: text_field(data, "appointment"),

        supplement_list: supplement_list(data),
        supplement_name: aligned_list_field(data, "supplementName"),

        blood_pressure: text_field(data, "bloodPressure"),
        blood_pressure_unit: text_field(data, "bloodPressureUnit"),
        body_temperature: text_field(data, "bodyTemperature"),
        body_temperature_unit: text_field(data, "bodyTemperatureUnit"),
        body_heart_rate: text_field(data, "bodyHeartRate"),
        body_heart_rate_unit: text_field(data, "bodyHeartRateUnit"),
        respiratory_rate: text_field(data, "respiratoryRate"),
        weight_kg: text_field(data, "weightKg"),
        bmi: text_field(data, "bmi"),

        medication_list,
        medication_name,
        dosage,
        frequency,
        remarks,
    }
}

/// Complete a current-schema record.
///
/// Splits the three composite vital-sign fields into magnitude and unit and
/// rebuilds `prescription` from `medications`, discarding whatever
/// prescription the model produced itself.
pub fn complete_current(data: &Map<String, Value>) -> PatientRecord {
    let medications: Vec<MedicationItem> = object_list_field(data, "medications")
        .into_iter()
        .map(|m| MedicationItem {
            name: text_field(m, "name"),
            dosage: text_field(m, "dosage"),
            frequency: text_field(m, "frequency"),
        })
        .collect();

    let prescription = rebuild_prescription(&medications);

    let SplitMeasurement {
        magnitude: blood_pressure,
        unit: blood_pressure_unit,
    } = split_value_and_unit(data.get("blood_pressure"), BLOOD_PRESSURE_UNIT);
    let SplitMeasurement {
        magnitude: body_heart_rate,
        unit: body_heart_rate_unit,
    } = split_value_and_unit(data.get("body_heartRate"), HEART_RATE_UNIT);
    let SplitMeasurement {
        magnitude: weight_kg,
        unit: weight_kg_unit,
    } = split_value_and_unit(data.get("weight_kg"), WEIGHT_UNIT);

    PatientRecord {
        name: text_field(data, "name"),
        age: age_field(data, "age"),
        gender: text_field(data, "gender"),
        address: text_field(data, "address"),
        phone: text_field(data, "phone"),
        symptoms: text_field(data, "symptoms"),

        diagnosis: text_list_field(data, "diagnosis"),
        medications,

        treatment: text_field(data, "treatment"),
        exercise: text_field(data, "exercise"),
        diet: text_field(data, "diet"),

        mind_set: text_list_field(data, "mindSet"),
        follow_ups: text_list_field(data, "followUps"),
        books: text_list_field(data, "books"),

        sleep_from: text_field(data, "sleepFrom"),
        sleep_to: text_field(data, "sleepTo"),
        appointment: text_field(data, "appointment"),

        supplement_list: supplement_list(data),

        blood_pressure,
        blood_pressure_unit,
        body_heart_rate,
        body_heart_rate_unit,
        weight_kg,
        weight_kg_unit,

        hba1c_percent: text_field(data, "hba1c_percent"),
        bsl_fasting: text_field(data, "bsl_fasting"),
        bsl_postprandial: text_field(data, "bsl_postprandial"),
        bsl_random: text_field(data, "bsl_random"),
        insulin_fasting: text_field(data, "insulin_fasting"),
        insulin_postprandial: text_field(data, "insulin_postprandial"),
        tsh_level: text_field(data, "tsh_level"),
        c_peptide_fasting: text_field(data, "c_peptide_fasting"),
        c_peptide_postprandial: text_field(data, "c_peptide_postprandial"),
        creatinine_level: text_field(data, "creatinine_level"),

        prescription,
    }
}

/// Medication names only, in order, skipping entries without a usable name.
pub fn rebuild_prescription(medications: &[MedicationItem]) -> Prescription {
    let medication_list = medications
        .iter()
        .filter_map(|m| m.name.as_deref())
        .filter(|name| !name.is_empty())
        .map(|name| PrescribedMedication {
            medication_name: name.to_string(),
        })
        .collect();

    Prescription {
        medication_list,
        file_key: None,
    }
}

/// `supplementList` entries: objects are read by field, a bare string is
/// taken as the supplement name, anything else is skipped.
fn supplement_list(data: &Map<String, Value>) -> Vec<SupplementEntry> {
    let Some(Value::Array(items)) = data.get("supplementList") else {
        return vec![];
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(SupplementEntry {
                supplement_name: text_field(obj, "supplementName"),
            }),
            Value::String(_) => Some(SupplementEntry {
                supplement_name: coerce_text(item),
            }),
            _ => {
                tracing::warn!("Skipping unreadable supplementList entry in model output");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    // ── Legacy ──────────────────────────────────

    #[test]
    fn legacy_empty_object_gets_all_defaults() {
        let record = complete_legacy(&Map::new());
        assert!(record.medication_list.is_empty());
        assert!(record.medication_name.is_empty());
        assert!(record.dosage.is_empty());
        assert!(record.frequency.is_empty());
        assert!(record.remarks.is_empty());
        assert!(record.supplement_list.is_empty());
        assert!(record.supplement_name.is_empty());
        assert_eq!(record, LegacyPatientRecord::default());
    }

    #[test]
    fn legacy_null_lists_become_empty() {
        let data = obj(json!({
            "medicationList": null,
            "medicationName": null,
            "dosage": null,
            "frequency": null,
            "remarks": null,
            "supplementList": null
        }));
        let record = complete_legacy(&data);
        assert!(record.medication_list.is_empty());
        assert!(record.medication_name.is_empty());
        assert!(record.supplement_list.is_empty());
    }

    #[test]
    fn legacy_derives_parallel_arrays_in_order() {
        let data = obj(json!({
            "medicationList": [
                {"medicationName": "Metformin", "dosage": "500mg", "frequency": "twice daily", "remarks": "with food"},
                {"medicationName": "Lisinopril", "dosage": "10mg", "frequency": "once daily"},
                {"medicationName": null, "dosage": "1 tab", "frequency": null, "remarks": "unnamed"}
            ],
            "medicationName": [],
            "dosage": []
        }));
        let record = complete_legacy(&data);

        assert_eq!(record.medication_list.len(), 3);
        assert_eq!(record.medication_name, vec![some("Metformin"), some("Lisinopril"), None]);
        assert_eq!(record.dosage, vec![some("500mg"), some("10mg"), some("1 tab")]);
        assert_eq!(record.frequency, vec![some("twice daily"), some("once daily"), None]);
        assert_eq!(record.remarks, vec![some("with food"), None, some("unnamed")]);

        for (i, entry) in record.medication_list.iter().enumerate() {
            assert_eq!(record.medication_name[i], entry.medication_name);
            assert_eq!(record.dosage[i], entry.dosage);
            assert_eq!(record.frequency[i], entry.frequency);
            assert_eq!(record.remarks[i], entry.remarks);
        }
    }

    #[test]
    fn legacy_prepopulated_arrays_are_kept() {
        let data = obj(json!({
            "medicationList": [
                {"medicationName": "Metformin", "dosage": "500mg", "frequency": "bd", "remarks": null}
            ],
            "medicationName": ["Aspirin", "Atorvastatin"],
            "dosage": ["75mg", "20mg"],
            "frequency": ["od", "nocte"],
            "remarks": [null, "after dinner"]
        }));
        let record = complete_legacy(&data);

        assert_eq!(record.medication_list.len(), 1);
        assert_eq!(record.medication_name, vec![some("Aspirin"), some("Atorvastatin")]);
        assert_eq!(record.dosage, vec![some("75mg"), some("20mg")]);
        assert_eq!(record.frequency, vec![some("od"), some("nocte")]);
        assert_eq!(record.remarks, vec![None, some("after dinner")]);
    }

    #[test]
    fn legacy_arrays_never_rebuild_medication_list() {
        let data = obj(json!({
            "medicationName": ["Aspirin"],
            "dosage": ["75mg"]
        }));
        let record = complete_legacy(&data);
        assert!(record.medication_list.is_empty());
        assert_eq!(record.medication_name, vec![some("Aspirin")]);
        assert!(record.frequency.is_empty());
    }

    #[test]
    fn legacy_derivation_overwrites_partial_arrays_when_names_empty() {
        let data = obj(json!({
            "medicationList": [{"medicationName": "Metformin", "dosage": "500mg"}],
            "medicationName": [],
            "dosage": ["stale", "values"]
        }));
        let record = complete_legacy(&data);
        assert_eq!(record.dosage, vec![some("500mg")]);
        assert_eq!(record.frequency, vec![None]);
    }

    #[test]
    fn legacy_skips_non_object_medications() {
        let data = obj(json!({
            "medicationList": ["Metformin", {"medicationName": "Lisinopril"}]
        }));
        let record = complete_legacy(&data);
        assert_eq!(record.medication_list.len(), 1);
        assert_eq!(record.medication_name, vec![some("Lisinopril")]);
    }

    #[test]
    fn legacy_supplement_name_is_not_derived() {
        let data = obj(json!({
            "supplementList": [{"supplementName": "Vitamin D"}, "Omega-3", 5]
        }));
        let record = complete_legacy(&data);
        assert_eq!(
            record.supplement_list,
            vec![
                SupplementEntry { supplement_name: some("Vitamin D") },
                SupplementEntry { supplement_name: some("Omega-3") },
            ]
        );
        assert!(record.supplement_name.is_empty());
    }

    #[test]
    fn legacy_scalar_fields_are_coerced() {
        let data = obj(json!({
            "symptoms": "fatigue and thirst",
            "diagnosis": ["Type 2 diabetes"],
            "bmi": 27.4,
            "respiratoryRate": 16,
            "bloodPressure": "130/85",
            "bloodPressureUnit": "mmHg",
            "diet": {"unexpected": "object"},
            "notInSchema": "dropped"
        }));
        let record = complete_legacy(&data);
        assert_eq!(record.symptoms, some("fatigue and thirst"));
        assert_eq!(record.diagnosis, vec!["Type 2 diabetes".to_string()]);
        assert_eq!(record.bmi, some("27.4"));
        assert_eq!(record.respiratory_rate, some("16"));
        assert_eq!(record.blood_pressure, some("130/85"));
        assert_eq!(record.blood_pressure_unit, some("mmHg"));
        assert_eq!(record.diet, None);

        let out = serde_json::to_value(&record).unwrap();
        assert!(out.get("notInSchema").is_none());
    }

    #[test]
    fn legacy_mind_set_list_is_joined() {
        let data = obj(json!({"mindSet": ["anxious", "motivated"]}));
        let record = complete_legacy(&data);
        assert_eq!(record.mind_set, some("anxious, motivated"));
    }

    #[test]
    fn legacy_serializes_every_key_in_camel_case() {
        let out = serde_json::to_value(complete_legacy(&Map::new())).unwrap();
        for key in [
            "symptoms", "diagnosis", "mindSet", "followUps", "sleepFrom", "supplementList",
            "supplementName", "bloodPressureUnit", "bodyHeartRate", "weightKg", "medicationList",
            "medicationName", "dosage", "frequency", "remarks",
        ] {
            assert!(out.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(out["medicationList"], json!([]));
        assert_eq!(out["symptoms"], Value::Null);
    }

    // ── Current ─────────────────────────────────

    #[test]
    fn current_splits_vital_signs() {
        let data = obj(json!({
            "blood_pressure": "120/80 mmHg",
            "blood_pressure_unit": null,
            "body_heartRate": "72",
            "weight_kg": "72 kg"
        }));
        let record = complete_current(&data);
        assert_eq!(record.blood_pressure, some("120/80"));
        assert_eq!(record.blood_pressure_unit, "mmHg");
        assert_eq!(record.body_heart_rate, some("72"));
        assert_eq!(record.body_heart_rate_unit, "beats/min");
        assert_eq!(record.weight_kg, some("72"));
        assert_eq!(record.weight_kg_unit, "kg");
    }

    #[test]
    fn current_missing_vitals_get_default_units() {
        let record = complete_current(&Map::new());
        assert_eq!(record.blood_pressure, None);
        assert_eq!(record.blood_pressure_unit, "mmHg");
        assert_eq!(record.body_heart_rate, None);
        assert_eq!(record.body_heart_rate_unit, "beats/min");
        assert_eq!(record.weight_kg, None);
        assert_eq!(record.weight_kg_unit, "kg");
    }

    #[test]
    fn current_model_unit_field_is_overwritten() {
        let data = obj(json!({"weight_kg": "160", "weight_kg_unit": "lbs"}));
        let record = complete_current(&data);
        assert_eq!(record.weight_kg, some("160"));
        assert_eq!(record.weight_kg_unit, "kg");
    }

    #[test]
    fn current_numeric_vital_is_not_a_string() {
        let data = obj(json!({"weight_kg": 72}));
        let record = complete_current(&data);
        assert_eq!(record.weight_kg, None);
        assert_eq!(record.weight_kg_unit, "kg");
    }

    #[test]
    fn prescription_drops_unnamed_and_keeps_order() {
        let data = obj(json!({
            "medications": [
                {"name": "A", "dosage": "1", "frequency": "od"},
                {"name": ""},
                {"dosage": "5mg"},
                {"name": null},
                {"name": "B"}
            ]
        }));
        let record = complete_current(&data);
        assert_eq!(record.medications.len(), 5);
        assert_eq!(
            serde_json::to_value(&record.prescription).unwrap(),
            json!({
                "medicationList": [{"medicationName": "A"}, {"medicationName": "B"}],
                "fileKey": null
            })
        );
    }

    #[test]
    fn prescription_from_model_is_discarded() {
        let data = obj(json!({
            "medications": [],
            "prescription": {
                "medicationList": [{"medicationName": "Invented"}],
                "fileKey": "s3://somewhere"
            }
        }));
        let record = complete_current(&data);
        assert!(record.prescription.medication_list.is_empty());
        assert_eq!(record.prescription.file_key, None);
    }

    #[test]
    fn current_reads_demographics_and_labs() {
        let data = obj(json!({
            "name": "Asha Rao",
            "age": "58",
            "gender": "female",
            "phone": 5551234,
            "diagnosis": "hypothyroidism",
            "mindSet": ["anxious about results"],
            "hba1c_percent": "6.8",
            "tsh_level": 5.2,
            "supplementList": ["Vitamin B12"]
        }));
        let record = complete_current(&data);
        assert_eq!(record.name, some("Asha Rao"));
        assert_eq!(record.age, Some(58));
        assert_eq!(record.gender, some("female"));
        assert_eq!(record.phone, some("5551234"));
        assert_eq!(record.diagnosis, vec!["hypothyroidism".to_string()]);
        assert_eq!(record.mind_set, vec!["anxious about results".to_string()]);
        assert_eq!(record.hba1c_percent, some("6.8"));
        assert_eq!(record.tsh_level, some("5.2"));
        assert_eq!(record.supplement_list[0].supplement_name, some("Vitamin B12"));
    }

    #[test]
    fn current_serializes_with_mixed_case_keys() {
        let out = serde_json::to_value(complete_current(&Map::new())).unwrap();
        for key in [
            "name", "age", "medications", "mindSet", "followUps", "sleepFrom", "supplementList",
            "blood_pressure", "blood_pressure_unit", "body_heartRate", "body_heartRate_unit",
            "weight_kg", "weight_kg_unit", "creatinine_level", "prescription",
        ] {
            assert!(out.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(out["body_heartRate_unit"], json!("beats/min"));
        assert_eq!(out["prescription"]["fileKey"], Value::Null);
    }
}
