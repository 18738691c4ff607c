use serde::{Deserialize, Serialize};

use super::{PreferenceValue, Setting};

/// UI locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fi,
}

impl Language {
    /// Locale code, also the key into localized station names
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fi => "fi",
        }
    }
}

impl PreferenceValue for Language {
    const KEY: &'static str = "language";

    fn next(self) -> Self {
        match self {
            Language::En => Language::Fi,
            Language::Fi => Language::En,
        }
    }
}

pub type LanguageRegistry = Setting<Language>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serialized_form() {
        for lang in [Language::En, Language::Fi] {
            assert_eq!(
                serde_json::to_string(&lang).unwrap(),
                format!("\"{}\"", lang.code())
            );
        }
    }
}
