//! Plain JSON exports: the whole file is the record array.

use dashdiff_recon::RecordCollection;

use super::{parse_array, ExtractError, Extractor};

pub struct JsonArrayExtractor;

impl Extractor for JsonArrayExtractor {
    fn name(&self) -> &'static str {
        "json_array"
    }

    fn extract_str(&self, text: &str) -> Result<RecordCollection, ExtractError> {
        parse_array(text)
    }
}
