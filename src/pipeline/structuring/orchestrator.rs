use std::path::Path;

use uuid::Uuid;

use super::completion::{complete_current, complete_legacy};
use super::parser::parse_model_output;
use super::prompt::build_extraction_prompt;
use super::sanitize::prepare_transcript;
use super::types::{ExtractedRecord, LlmClient, SchemaVariant};
use super::ExtractionError;

/// Orchestrates one extraction:
/// prepare transcript → prompt → model → sanitize/parse → schema completion
pub struct TranscriptExtractor {
    llm: Box<dyn LlmClient + Send + Sync>,
    model_name: String,
}

impl TranscriptExtractor {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Extract a normalized record from transcript text.
    pub fn extract(
        &self,
        transcript: &str,
        variant: SchemaVariant,
    ) -> Result<ExtractedRecord, ExtractionError> {
        let request_id = Uuid::new_v4();
        let _span = tracing::info_span!("extract", %request_id, ?variant).entered();

        let prepared = prepare_transcript(transcript);
        if prepared.is_empty() {
            return Err(ExtractionError::EmptyTranscript);
        }

        let prompt = build_extraction_prompt(&prepared, variant);
        tracing::debug!(
            transcript_chars = prepared.chars().count(),
            model = %self.model_name,
            "Calling model"
        );

        let raw = self.llm.generate(&self.model_name, &prompt).map_err(|e| {
            tracing::error!(error = %e, "Model call failed");
            e
        })?;

        let data = parse_model_output(&raw).map_err(|e| {
            tracing::error!(error = %e, raw_output = %raw, "Model output could not be parsed");
            e
        })?;

        let record = match variant {
            SchemaVariant::Legacy => ExtractedRecord::Legacy(complete_legacy(&data)),
            SchemaVariant::Current => ExtractedRecord::Current(complete_current(&data)),
        };

        tracing::info!(fields = data.len(), "Extraction complete");
        Ok(record)
    }

    /// Read a stored transcript and extract from it.
    ///
    /// A missing file fails before the model is called.
    pub fn extract_from_file(
        &self,
        path: &Path,
        variant: SchemaVariant,
    ) -> Result<ExtractedRecord, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::InputNotFound(path.to_path_buf()));
        }

        let transcript = std::fs::read_to_string(path)?;
        self.extract(&transcript, variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::structuring::gemini::MockLlmClient;

    fn extractor_with(response: &str) -> (TranscriptExtractor, Arc<MockLlmClient>) {
        let llm = Arc::new(MockLlmClient::new(response));
        let extractor = TranscriptExtractor::new(Box::new(llm.clone()), "gemini-2.5-flash");
        (extractor, llm)
    }

    const LEGACY_RESPONSE: &str = r#"```json
{
  "symptoms": "Frequent urination and fatigue",
  "diagnosis": ["Type 2 diabetes"],
  "medicationList": [
    {"medicationName": "Metformin", "dosage": "500mg", "frequency": "twice daily", "remarks": "after meals"},
    {"medicationName": "Vitamin D3", "dosage": "1000 IU", "frequency": "daily", "remarks": null}
  ],
  "medicationName": [],
  "dosage": [],
  "frequency": [],
  "remarks": [],
  "supplementList": null
}
```"#;

    const CURRENT_RESPONSE: &str = r#"
```json
{
  "name": "John Doe",
  "age": 45,
  "medications": [
    {"name": "Amlodipine", "dosage": "5mg", "frequency": "once daily"},
    {"name": "", "dosage": "2 puffs", "frequency": "as needed"}
  ],
  "blood_pressure": "150/95 mmHg",
  "body_heartRate": "88",
  "weight_kg": "91 kg",
  "prescription": null
}
```
"#;

    #[test]
    fn legacy_pipeline_derives_arrays() {
        let (extractor, llm) = extractor_with(LEGACY_RESPONSE);
        let record = extractor
            .extract("Doctor: any medicines? Patient: Metformin 500mg twice daily.", SchemaVariant::Legacy)
            .unwrap();

        assert_eq!(llm.call_count(), 1);
        let ExtractedRecord::Legacy(record) = record else {
            panic!("expected legacy record");
        };
        assert_eq!(record.medication_list.len(), 2);
        assert_eq!(
            record.medication_name,
            vec![Some("Metformin".to_string()), Some("Vitamin D3".to_string())]
        );
        assert_eq!(record.remarks, vec![Some("after meals".to_string()), None]);
        assert!(record.supplement_list.is_empty());
    }

    #[test]
    fn current_pipeline_splits_units_and_rebuilds_prescription() {
        let (extractor, _llm) = extractor_with(CURRENT_RESPONSE);
        let record = extractor
            .extract("Blood pressure is 150 over 95 today.", SchemaVariant::Current)
            .unwrap();

        let ExtractedRecord::Current(record) = record else {
            panic!("expected current record");
        };
        assert_eq!(record.age, Some(45));
        assert_eq!(record.blood_pressure.as_deref(), Some("150/95"));
        assert_eq!(record.blood_pressure_unit, "mmHg");
        assert_eq!(record.body_heart_rate.as_deref(), Some("88"));
        assert_eq!(record.body_heart_rate_unit, "beats/min");
        assert_eq!(record.weight_kg.as_deref(), Some("91"));
        assert_eq!(record.prescription.medication_list.len(), 1);
        assert_eq!(record.prescription.medication_list[0].medication_name, "Amlodipine");
        assert_eq!(record.prescription.file_key, None);
    }

    #[test]
    fn malformed_output_is_parse_error() {
        let (extractor, _llm) = extractor_with("```json\n{\"symptoms\": \"cough\",\n```");
        let err = extractor
            .extract("Patient reports cough.", SchemaVariant::Legacy)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionParse { .. }));
        assert!(err.raw_output().unwrap().contains("cough"));
    }

    #[test]
    fn model_failure_propagates() {
        let extractor = TranscriptExtractor::new(
            Box::new(MockLlmClient::failing("Provider returned status 503: unavailable")),
            "gemini-2.5-flash",
        );
        let err = extractor
            .extract("Patient reports cough.", SchemaVariant::Current)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::ModelCall(_)));
    }

    #[test]
    fn empty_transcript_skips_model_call() {
        let (extractor, llm) = extractor_with(LEGACY_RESPONSE);
        let err = extractor.extract(" \n\u{200B}\n ", SchemaVariant::Legacy).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyTranscript));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn missing_file_fails_before_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let (extractor, llm) = extractor_with(LEGACY_RESPONSE);

        let missing = dir.path().join("nope.txt");
        let err = extractor
            .extract_from_file(&missing, SchemaVariant::Legacy)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InputNotFound(ref p) if p == &missing));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn reads_transcript_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visit.txt");
        std::fs::write(&path, "Patient takes Metformin 500mg twice daily.").unwrap();

        let (extractor, llm) = extractor_with(LEGACY_RESPONSE);
        let record = extractor.extract_from_file(&path, SchemaVariant::Legacy).unwrap();
        assert_eq!(record.variant(), SchemaVariant::Legacy);
        assert_eq!(llm.call_count(), 1);
    }

    #[test]
    fn non_utf8_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let (extractor, llm) = extractor_with(LEGACY_RESPONSE);
        let err = extractor.extract_from_file(&path, SchemaVariant::Legacy).unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
        assert_eq!(llm.call_count(), 0);
    }
}
