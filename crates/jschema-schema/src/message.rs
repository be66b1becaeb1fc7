//! Validation messages and their translations.

use std::fmt;

use crate::lang::Lang;

/// What went wrong at a node, independent of the language it is shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The value's kind is not one of the declared types.
    InvalidType { expected: Vec<String> },
    /// An object lacks a property listed in `required`.
    MissingRequired { property: String },
    /// An object has a property the schema forbids.
    UnknownProperty {
        property: String,
        suggestion: Option<String>,
    },
    /// The value is not one of the `enum` members (shown as JSON text).
    NotInEnum { allowed: Vec<String> },
    /// The value differs from `const` (shown as JSON text).
    NotConst { expected: String },
    TooShort { min: u64 },
    TooLong { max: u64 },
    TooSmall { minimum: String },
    TooLarge { maximum: String },
    TooFewItems { min: u64 },
    TooManyItems { max: u64 },
    /// A [`FormatChecker`](crate::FormatChecker) rejected the string.
    InvalidFormat { format: String },
    /// A `$ref` that does not point into the root schema.
    UnresolvedRef { reference: String },
}

impl Message {
    /// Resolve the message for a locale string; unknown locales get English.
    pub fn text(&self, locale: &str) -> String {
        self.text_for(Lang::from_locale(locale))
    }

    pub fn text_for(&self, lang: Lang) -> String {
        match lang {
            Lang::En => self.english(),
            Lang::Fr => self.french(),
        }
    }

    fn english(&self) -> String {
        match self {
            Message::InvalidType { expected } => {
                format!("Invalid type: expected {}", expected.join(" or "))
            }
            Message::MissingRequired { property } => {
                format!("Missing required property: {property}")
            }
            Message::UnknownProperty {
                property,
                suggestion: Some(suggestion),
            } => format!("Unknown property: {property} (did you mean {suggestion}?)"),
            Message::UnknownProperty { property, .. } => format!("Unknown property: {property}"),
            Message::NotInEnum { allowed } => {
                format!("Value not allowed: expected one of {}", allowed.join(", "))
            }
            Message::NotConst { expected } => format!("Invalid value: expected {expected}"),
            Message::TooShort { min } => format!("String too short: minimum length is {min}"),
            Message::TooLong { max } => format!("String too long: maximum length is {max}"),
            Message::TooSmall { minimum } => format!("Number too small: minimum is {minimum}"),
            Message::TooLarge { maximum } => format!("Number too large: maximum is {maximum}"),
            Message::TooFewItems { min } => format!("Too few items: minimum is {min}"),
            Message::TooManyItems { max } => format!("Too many items: maximum is {max}"),
            Message::InvalidFormat { format } => format!("Invalid format: expected {format}"),
            Message::UnresolvedRef { reference } => {
                format!("Unresolved schema reference: {reference}")
            }
        }
    }

    fn french(&self) -> String {
        match self {
            Message::InvalidType { expected } => {
                format!("Type invalide : {} attendu", expected.join(" ou "))
            }
            Message::MissingRequired { property } => {
                format!("Propriété obligatoire manquante : {property}")
            }
            Message::UnknownProperty {
                property,
                suggestion: Some(suggestion),
            } => format!("Propriété inconnue : {property} (vouliez-vous dire {suggestion} ?)"),
            Message::UnknownProperty { property, .. } => format!("Propriété inconnue : {property}"),
            Message::NotInEnum { allowed } => {
                format!("Valeur non autorisée : attendu l'une de {}", allowed.join(", "))
            }
            Message::NotConst { expected } => format!("Valeur invalide : {expected} attendu"),
            Message::TooShort { min } => {
                format!("Chaîne trop courte : longueur minimale {min}")
            }
            Message::TooLong { max } => format!("Chaîne trop longue : longueur maximale {max}"),
            Message::TooSmall { minimum } => format!("Nombre trop petit : minimum {minimum}"),
            Message::TooLarge { maximum } => format!("Nombre trop grand : maximum {maximum}"),
            Message::TooFewItems { min } => format!("Trop peu d'éléments : minimum {min}"),
            Message::TooManyItems { max } => format!("Trop d'éléments : maximum {max}"),
            Message::InvalidFormat { format } => format!("Format invalide : {format} attendu"),
            Message::UnresolvedRef { reference } => {
                format!("Référence de schéma introuvable : {reference}")
            }
        }
    }
}

/// Shows the message in the process-wide language.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text_for(Lang::current()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_text() {
        let message = Message::InvalidType {
            expected: vec!["string".into()],
        };
        assert_eq!(message.text("en"), "Invalid type: expected string");

        let message = Message::InvalidType {
            expected: vec!["string".into(), "null".into()],
        };
        assert_eq!(message.text("en"), "Invalid type: expected string or null");
        assert_eq!(message.text("fr"), "Type invalide : string ou null attendu");
    }

    #[test]
    fn test_unknown_locale_is_english() {
        let message = Message::MissingRequired {
            property: "name".into(),
        };
        assert_eq!(message.text("xx"), message.text("en"));
    }

    #[test]
    fn test_suggestion() {
        let message = Message::UnknownProperty {
            property: "nmae".into(),
            suggestion: Some("name".into()),
        };
        assert_eq!(
            message.text("en"),
            "Unknown property: nmae (did you mean name?)"
        );
    }
}
