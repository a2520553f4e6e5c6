use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a card number is too short to reveal any digits.
pub const MASK_PLACEHOLDER: &str = "****";

/// Prefix rendered in front of the last four digits of a card number.
const MASK_PREFIX: &str = "**** **** **** ";

/// A payment card number that masks itself in Debug and Display output.
///
/// Serialization keeps the real value because the payload is handed to the
/// workflow client as-is. This wrapper only prevents accidental leakage in
/// log macros like `tracing::info!("{:?}", order)`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// The unmasked number. Never log this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering: `**** **** **** 3456`, or `****` for short numbers.
    pub fn masked(&self) -> String {
        mask_card_number(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl From<&str> for CardNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

/// Mask all but the last four characters of a card number.
pub fn mask_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() < 4 {
        return MASK_PLACEHOLDER.to_string();
    }

    let last_four: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", MASK_PREFIX, last_four)
}
