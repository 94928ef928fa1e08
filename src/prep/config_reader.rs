use crate::prep::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputSource {
    /// csv or xlsx
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    /// How an undefined share (0/0) is written.
    #[serde(rename = "naRepresentation")]
    pub na_representation: Option<String>,
    /// Replaces the default list of output columns.
    pub columns: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrepRules {
    #[serde(rename = "missingValuePolicy")]
    pub _missing_value_policy: Option<String>,
}

impl PrepRules {
    pub fn missing_value_policy(&self) -> PrepResult<MissingValuePolicy> {
        match &self._missing_value_policy {
            Some(s) => parse_missing_value_policy(s),
            None => Ok(ProfileRules::DEFAULT_RULES.missing_value_policy),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrepConfig {
    #[serde(rename = "inputSource", default)]
    pub input_source: InputSource,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub rules: PrepRules,
}

pub fn parse_missing_value_policy(s: &str) -> PrepResult<MissingValuePolicy> {
    match s {
        "treatAsZero" => Ok(MissingValuePolicy::TreatAsZero),
        "reject" => Ok(MissingValuePolicy::Reject),
        "propagateAsUndefined" => Ok(MissingValuePolicy::PropagateAsUndefined),
        x => whatever!(
            "unknown missing value policy {:?} (treatAsZero, reject or propagateAsUndefined)",
            x
        ),
    }
}

pub fn read_config(path: &str) -> PrepResult<PrepConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: PrepConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config() {
        let c: PrepConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, PrepConfig::default());
        assert_eq!(
            c.rules.missing_value_policy().unwrap(),
            MissingValuePolicy::TreatAsZero
        );
    }

    #[test]
    fn full_config() {
        let c: PrepConfig = serde_json::from_str(
            r#"{
                "inputSource": { "provider": "xlsx", "filePath": "data.xlsx", "excelWorksheetName": "Ark1" },
                "outputSettings": { "outputPath": "stdout" },
                "rules": { "missingValuePolicy": "reject" }
            }"#,
        )
        .unwrap();
        assert_eq!(c.input_source.provider, Some("xlsx".to_string()));
        assert_eq!(c.input_source.excel_worksheet_name, Some("Ark1".to_string()));
        assert_eq!(c.output_settings.output_path, Some("stdout".to_string()));
        assert_eq!(
            c.rules.missing_value_policy().unwrap(),
            MissingValuePolicy::Reject
        );
    }
}
