//! Generated dashboard scripts: `const hydrationData = [ {...}, ... ];`

use regex::Regex;

use dashdiff_recon::RecordCollection;

use super::{parse_array, ExtractError, Extractor};

/// Scrapes a named array literal out of generated JavaScript.
///
/// The block runs from `const <variable> = [` to the first `];`. Trailing
/// commas before `}` or `]` are dropped so hand-edited files still parse.
pub struct JsArrayExtractor {
    variable: String,
    block: Regex,
    trailing_comma: Regex,
}

impl JsArrayExtractor {
    pub fn new(variable: &str) -> Result<Self, ExtractError> {
        let block = Regex::new(&format!(
            r"(?s)const\s+{}\s*=\s*(\[.*?\]);",
            regex::escape(variable)
        ))
        .map_err(|e| ExtractError::Setup(e.to_string()))?;
        let trailing_comma =
            Regex::new(r",\s*([}\]])").map_err(|e| ExtractError::Setup(e.to_string()))?;

        Ok(Self {
            variable: variable.to_string(),
            block,
            trailing_comma,
        })
    }
}

impl Extractor for JsArrayExtractor {
    fn name(&self) -> &'static str {
        "js_array"
    }

    fn extract_str(&self, text: &str) -> Result<RecordCollection, ExtractError> {
        let caps = self
            .block
            .captures(text)
            .ok_or_else(|| ExtractError::MarkerNotFound {
                variable: self.variable.clone(),
            })?;
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let cleaned = self.trailing_comma.replace_all(raw, "$1");
        parse_array(&cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashdiff_recon::FieldValue;

    const GENERATED: &str = r#"// Auto-generated dashboard data from hydration_goals.csv
// Generated on: 2025-12-20 13:37:26
// Total residents: 2

const hydrationData = [
            {
                        "name": "Boothe, Birdell",
                        "goal": 1425.0,
                        "source": "4.pdf - Page 1",
                        "missed3Days": "no",
                        "data": 2350.0
            },
            {
                        "name": "Chiao, Victoria",
                        "goal": 1312.0,
                        "source": "4.pdf - Page 16",
                        "missed3Days": "no",
                        "data": 2450.0
            }
];

const chartData = [1, 2, 3];
"#;

    fn extractor() -> JsArrayExtractor {
        JsArrayExtractor::new("hydrationData").unwrap()
    }

    #[test]
    fn extracts_generated_block() {
        let c = extractor().extract_str(GENERATED).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.entries[0].field("name"), &FieldValue::Str("Boothe, Birdell".into()));
        assert_eq!(c.entries[1].field("goal"), &FieldValue::Float(1312.0));
    }

    #[test]
    fn tolerates_trailing_commas() {
        let text = "const hydrationData = [\n {\"name\": \"A\", \"goal\": 1,},\n {\"name\": \"B\",},\n];";
        let c = extractor().extract_str(text).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.entries[0].field("goal"), &FieldValue::Int(1));
    }

    #[test]
    fn empty_array() {
        let c = extractor().extract_str("const hydrationData = [];").unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn missing_marker() {
        let err = extractor().extract_str("const otherData = [];").unwrap_err();
        assert!(matches!(err, ExtractError::MarkerNotFound { ref variable } if variable == "hydrationData"));
    }

    #[test]
    fn unterminated_block() {
        let err = extractor().extract_str("const hydrationData = [{\"name\": \"A\"}]").unwrap_err();
        assert!(matches!(err, ExtractError::MarkerNotFound { .. }));
    }

    #[test]
    fn invalid_json() {
        let err = extractor()
            .extract_str("const hydrationData = [{name: 'A'}];")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn variable_name_is_escaped() {
        let ex = JsArrayExtractor::new("data.v2").unwrap();
        assert!(ex.extract_str("const dataXv2 = [];").is_err());
        assert!(ex.extract_str("const data.v2 = [];").is_ok());
    }
}
