//! Payment cards.
//!
//! A [`Card`] can always be constructed; whether it is usable is decided
//! later by [`validate_card`]. Only structure is checked: the number must be
//! present and the expiration must decode to a real month. There is no
//! checksum validation.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Errors returned by [`validate_card`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// The card number is empty.
    #[error("card number cannot be empty")]
    EmptyNumber,
    /// The expiration does not decode into a month and year.
    #[error("could not read card expiration '{0}'")]
    InvalidExpiration(String),
    /// The expiration month is outside `1..=12`.
    #[error("expiration month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// Card brand, derived from the number's issuer prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Visa,
    MasterCard,
    AmericanExpress,
    Discover,
    Unknown,
}

impl CardKind {
    /// Detect the brand from the leading digits of a card number.
    #[must_use]
    pub fn detect(number: &str) -> Self {
        let prefix = |len: usize| -> u32 {
            number
                .get(..len)
                .and_then(|p| p.parse().ok())
                .unwrap_or_default()
        };

        if number.starts_with('4') {
            Self::Visa
        } else if matches!(prefix(2), 51..=55) || matches!(prefix(4), 2221..=2720) {
            Self::MasterCard
        } else if matches!(prefix(2), 34 | 37) {
            Self::AmericanExpress
        } else if prefix(4) == 6011 || prefix(2) == 65 || matches!(prefix(3), 644..=649) {
            Self::Discover
        } else {
            Self::Unknown
        }
    }

    /// Vendor name for the card type in a payment payload.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "VISA",
            Self::MasterCard => "MASTERCARD",
            Self::AmericanExpress => "AMEX",
            Self::Discover => "DISCOVER",
            Self::Unknown => "",
        }
    }
}

/// A payment card.
///
/// The number and security code are held as secrets and never appear in
/// `Debug` output.
#[derive(Clone)]
pub struct Card {
    number: SecretString,
    expiration: String,
    cvv: SecretString,
}

impl Card {
    /// Create a card. Never fails; see [`validate_card`].
    #[must_use]
    pub fn new(number: impl Into<String>, expiration: impl Into<String>, cvv: impl Into<String>) -> Self {
        Self {
            number: SecretString::from(number.into()),
            expiration: expiration.into(),
            cvv: SecretString::from(cvv.into()),
        }
    }

    /// The card number in clear text, for building a payment payload.
    #[must_use]
    pub fn expose_number(&self) -> &str {
        self.number.expose_secret()
    }

    /// The security code in clear text, for building a payment payload.
    #[must_use]
    pub fn expose_cvv(&self) -> &str {
        self.cvv.expose_secret()
    }

    /// The expiration exactly as it was entered.
    #[must_use]
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Month and year of expiration, if the raw string can be read.
    #[must_use]
    pub fn expires_on(&self) -> Option<(u32, u32)> {
        parse_expiration(&self.expiration)
    }

    /// Expiration in the vendor's `MMYY` form.
    #[must_use]
    pub fn expiration_code(&self) -> Option<String> {
        self.expires_on()
            .map(|(month, year)| format!("{month:02}{:02}", year % 100))
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        CardKind::detect(self.expose_number())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("number", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Read a card expiration into `(month, year)`.
///
/// Accepted shapes are `MM/YY`, `MM/YYYY`, `M/YY`, `M/YYYY` and `MMYY`. A one
/// or two digit year is prefixed with `20` as text, so `11/2` reads as year
/// `202`. Anything else, including six bare digits, returns `None`.
#[must_use]
pub fn parse_expiration(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let (month, year) = match s.split_once('/') {
        Some(parts) => parts,
        None if s.len() == 4 => s.split_at_checked(2)?,
        None => return None,
    };

    if month.len() > 2 || !is_digits(month) || !is_digits(year) {
        return None;
    }
    let year = match year.len() {
        1 | 2 => format!("20{year}"),
        4 => year.to_owned(),
        _ => return None,
    };

    Some((month.parse().ok()?, year.parse().ok()?))
}

/// Check that a card is structurally usable.
///
/// # Errors
///
/// Returns an error if the number is empty, the expiration cannot be read,
/// or the month is not between 1 and 12.
pub fn validate_card(card: &Card) -> Result<(), CardError> {
    if card.expose_number().is_empty() {
        return Err(CardError::EmptyNumber);
    }
    let (month, _) = card
        .expires_on()
        .ok_or_else(|| CardError::InvalidExpiration(card.expiration.clone()))?;
    if !(1..=12).contains(&month) {
        return Err(CardError::InvalidMonth(month));
    }
    Ok(())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
