//! Message language selection.
//!
//! The process-wide language is a fallback: every message can also be
//! resolved with an explicit locale, which is what tests and concurrent
//! callers should do.

use std::sync::RwLock;

static LANG: RwLock<Option<String>> = RwLock::new(None);

/// Languages with a message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    En,
    Fr,
}

impl Lang {
    /// Pick the catalog for a locale string such as `"fr"` or `"fr-CA"`.
    ///
    /// Unknown locales fall back to English.
    pub fn from_locale(locale: &str) -> Self {
        let primary = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "fr" => Lang::Fr,
            _ => Lang::En,
        }
    }

    /// The catalog selected by the process-wide language.
    pub fn current() -> Self {
        Self::from_locale(&current_lang())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Fr => "fr",
        }
    }
}

/// Set the process-wide language used when a message is resolved without an
/// explicit locale. Last writer wins.
pub fn set_lang(lang: &str) {
    let mut guard = LANG.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    tracing::debug!(lang, "message language set");
    *guard = Some(lang.to_string());
}

/// The process-wide language, `"en"` until [`set_lang`] is called.
pub fn current_lang() -> String {
    LANG.read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
        .unwrap_or_else(|| "en".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_locale() {
        assert_eq!(Lang::from_locale("fr"), Lang::Fr);
        assert_eq!(Lang::from_locale("FR-ca"), Lang::Fr);
        assert_eq!(Lang::from_locale("fr_FR"), Lang::Fr);
        assert_eq!(Lang::from_locale("en-US"), Lang::En);
        assert_eq!(Lang::from_locale("de"), Lang::En);
        assert_eq!(Lang::from_locale(""), Lang::En);
    }
}
