//! Target languages offered for translation.

/// A selectable target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// Short language code.
    pub code: &'static str,
    /// Display name sent to the model.
    pub name: &'static str,
}

/// Language code selected when nothing else is configured.
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

/// Name used when a code is not in the catalogue.
pub const FALLBACK_LANGUAGE_NAME: &str = "English";

/// All supported target languages, in display order.
pub const LANGUAGE_OPTIONS: [LanguageOption; 10] = [
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "es", name: "Spanish" },
    LanguageOption { code: "fr", name: "French" },
    LanguageOption { code: "de", name: "German" },
    LanguageOption { code: "ja", name: "Japanese" },
    LanguageOption { code: "zh", name: "Chinese (Simplified)" },
    LanguageOption { code: "ru", name: "Russian" },
    LanguageOption { code: "pt", name: "Portuguese" },
    LanguageOption { code: "ko", name: "Korean" },
    LanguageOption { code: "hi", name: "Hindi" },
];

/// Looks up a language by code.
pub fn find_language(code: &str) -> Option<&'static LanguageOption> {
    LANGUAGE_OPTIONS.iter().find(|option| option.code == code)
}

/// Display name for `code`, or English when the code is unknown.
pub fn language_name(code: &str) -> &'static str {
    find_language(code).map_or(FALLBACK_LANGUAGE_NAME, |option| option.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("es"), "Spanish");
        assert_eq!(language_name("zh"), "Chinese (Simplified)");
        assert_eq!(language_name("hi"), "Hindi");
        assert_eq!(language_name("xx"), "English");
        assert_eq!(language_name(""), "English");
    }

    #[test]
    fn test_default_is_in_catalogue() {
        assert!(find_language(DEFAULT_TARGET_LANGUAGE).is_some());
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in LANGUAGE_OPTIONS.iter().enumerate() {
            for b in &LANGUAGE_OPTIONS[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }
}
