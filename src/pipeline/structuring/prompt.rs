use super::types::SchemaVariant;

/// Build the extraction prompt for a transcript in the requested schema.
pub fn build_extraction_prompt(transcript: &str, variant: SchemaVariant) -> String {
    match variant {
        SchemaVariant::Legacy => build_legacy_prompt(transcript),
        SchemaVariant::Current => build_current_prompt(transcript),
    }
}

/// Prompt for the camelCase schema with parallel medication arrays.
pub fn build_legacy_prompt(transcript: &str) -> String {
    format!(
        r#"Extract patient medical data from the text below:
<transcript>
{transcript}
</transcript>

Return ONLY valid JSON with this structure:

{{
  "symptoms": "<short summary>",
  "diagnosis": ["<item1>", "<item2>"],
  "treatment": "<string|null>",
  "exercise": "<string|null>",
  "diet": "<string|null>",
  "mindSet": "<string|null>",
  "followUps": [],
  "books": [],
  "sleepFrom": "<string|null>",
  "sleepTo": "<string|null>",
  "appointment": "<string|null>",

  "supplementList": [
    {{
      "supplementName": "<string|null>"
    }}
  ],
  "supplementName": [],

  "bloodPressure": "<string|null>",
  "bloodPressureUnit": "<string|null>",
  "bodyTemperature": "<string|null>",
  "bodyTemperatureUnit": "<string|null>",
  "bodyHeartRate": "<string|null>",
  "bodyHeartRateUnit": "<string|null>",
  "respiratoryRate": "<string|null>",
  "weightKg": "<string|null>",
  "bmi": "<string|null>",

  "medicationList": [
    {{
      "medicationName": "<string|null>",
      "dosage": "<string|null>",
      "frequency": "<string|null>",
      "remarks": "<string|null>"
    }}
  ],

  "medicationName": [],
  "dosage": [],
  "frequency": [],
  "remarks": []
}}

Rules:
- Extract ALL real medicines.
- Return full medicationList objects.
- ALSO return separate arrays: medicationName[], dosage[], frequency[], remarks[]
- Arrays must align with medicationList index.
- If nothing is found, use empty arrays.
- Use camelCase keys.
"#
    )
}

/// Prompt for the current schema with separate unit fields and a prescription block.
pub fn build_current_prompt(transcript: &str) -> String {
    format!(
        r#"Extract patient medical data from this conversation text:

<transcript>
{transcript}
</transcript>

Return ONLY valid JSON matching this structure.

{{
  "name": "<name|null>",
  "age": <number|null>,
  "gender": "<male|female|other|null>",
  "address": "<address|null>",
  "phone": "<phone|null>",
  "symptoms": "<short summary>",

  "diagnosis": ["list"],

  "medications": [
    {{
      "name": "<medicine name|null>",
      "dosage": "<dosage|null>",
      "frequency": "<frequency|null>"
    }}
  ],

  "treatment": "<string|null>",
  "exercise": "<string|null>",
  "diet": "<string|null>",

  "mindSet": [],
  "followUps": [],
  "books": [],

  "sleepFrom": "<string|null>",
  "sleepTo": "<string|null>",
  "appointment": "<string|null>",

  "supplementList": [],

  "blood_pressure": "<value|null>",
  "blood_pressure_unit": "<unit|null>",

  "body_heartRate": "<value|null>",
  "body_heartRate_unit": "<unit|null>",

  "weight_kg": "<value|null>",
  "weight_kg_unit": "<unit|null>",

  "hba1c_percent": "<value|null>",
  "bsl_fasting": "<value|null>",
  "bsl_postprandial": "<value|null>",
  "bsl_random": "<value|null>",
  "insulin_fasting": "<value|null>",
  "insulin_postprandial": "<value|null>",
  "tsh_level": "<value|null>",
  "c_peptide_fasting": "<value|null>",
  "c_peptide_postprandial": "<value|null>",
  "creatinine_level": "<value|null>",

  "prescription": {{
    "medicationList": [
      {{
        "medicationName": "<medicine name only>"
      }}
    ],
    "fileKey": null
  }}
}}
"#
    )
}
