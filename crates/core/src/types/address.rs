//! Postal addresses in the shape the vendor's API expects.
//!
//! Two input forms are normalized into [`StreetAddr`]:
//!
//! - a single free-text line parsed by [`parse_address`]
//! - a structured [`UserAddress`] converted by [`StreetAddr::from_user_address`]
//!
//! Both forms agree on [`Address::line_one`] and [`Address::locality`], which are
//! sent verbatim as the store-locator query parameters.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing or decoding a [`StreetAddr`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input string is empty.
    #[error("address cannot be empty")]
    Empty,
    /// Nothing precedes the city name.
    #[error("address is missing a street")]
    MissingStreet,
    /// The first token of the street is not a number.
    #[error("street number must be numeric, got '{0}'")]
    InvalidStreetNumber(String),
    /// A street number with no name after it.
    #[error("address is missing a street name")]
    MissingStreetName,
    /// No token before the comma to use as the city.
    #[error("address is missing a city")]
    MissingCity,
    /// No comma separating the city from the state and zip.
    #[error("address is missing ', <state> <zip>' after the city")]
    MissingLocality,
    /// Nothing after the comma.
    #[error("address is missing a state code")]
    MissingState,
    /// The state token is not two letters.
    #[error("state must be a two-letter code, got '{0}'")]
    InvalidState(String),
    /// No token after the state.
    #[error("address is missing a zip code")]
    MissingZip,
    /// The zip token is not five digits.
    #[error("zip code must be 5 digits, got '{0}'")]
    InvalidZip(String),
    /// Text left over after the zip code.
    #[error("unexpected text after zip code: '{0}'")]
    TrailingText(String),
    /// A field does not fit the binary encoding's length prefix.
    #[error("address field is too long to encode ({0} bytes)")]
    FieldTooLong(usize),
    /// The encoded bytes end before every field was read.
    #[error("encoded address is truncated")]
    Truncated,
    /// The encoded bytes carry an unknown format version.
    #[error("unsupported address encoding version {0}")]
    UnsupportedVersion(u8),
    /// An encoded field is not UTF-8.
    #[error("encoded address is not valid UTF-8")]
    InvalidUtf8,
    /// An encoded address type is not one of [`AddressType`].
    #[error("unknown address type '{0}'")]
    UnknownType(String),
}

/// Anything that can be sent to the store locator.
pub trait Address {
    /// Street line, e.g. `1600 Pennsylvania Ave.`.
    fn line_one(&self) -> &str;
    /// City name.
    fn city(&self) -> &str;
    /// Two-letter state code.
    fn state_code(&self) -> &str;
    /// Five-digit zip code.
    fn zip(&self) -> &str;

    /// The `"<city>, <state> <zip>"` locality line.
    fn locality(&self) -> String {
        format!("{}, {} {}", self.city(), self.state_code(), self.zip())
    }
}

/// Kind of building at an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AddressType {
    #[default]
    House,
    Apartment,
    Business,
}

impl AddressType {
    /// Name used on the wire and in the binary encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Business => "Business",
        }
    }

    /// Classify a street name by the unit markers it contains.
    #[must_use]
    pub fn classify(street_name: &str) -> Self {
        const UNIT_MARKERS: &[&str] = &["apt", "apartment", "unit", "suite", "ste"];

        let has_unit = street_name.split_whitespace().any(|token| {
            let token = token.trim_end_matches(['.', ',']).to_ascii_lowercase();
            token.starts_with('#') || UNIT_MARKERS.contains(&token.as_str())
        });
        if has_unit { Self::Apartment } else { Self::House }
    }
}

impl std::str::FromStr for AddressType {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "House" => Ok(Self::House),
            "Apartment" => Ok(Self::Apartment),
            "Business" => Ok(Self::Business),
            other => Err(AddressError::UnknownType(other.to_owned())),
        }
    }
}

/// A structured address as typed by a user, with a single free-text street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct UserAddress {
    /// Street number and name in one field.
    pub street: String,
    pub city_name: String,
    /// State code.
    pub region: String,
    /// Zip code.
    pub postal_code: String,
}

impl Address for UserAddress {
    fn line_one(&self) -> &str {
        self.street.trim()
    }

    fn city(&self) -> &str {
        &self.city_name
    }

    fn state_code(&self) -> &str {
        &self.region
    }

    fn zip(&self) -> &str {
        &self.postal_code
    }
}

/// Canonical decomposed street address; the vendor's wire form.
///
/// ## Examples
///
/// ```
/// use apizza_core::{Address, parse_address};
///
/// let addr = parse_address("1600 Pennsylvania Ave. Washington, DC 20500").unwrap();
/// assert_eq!(addr.street_num, "1600");
/// assert_eq!(addr.line_one(), "1600 Pennsylvania Ave.");
/// assert_eq!(addr.locality(), "Washington, DC 20500");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreetAddr {
    #[serde(rename = "StreetNumber")]
    pub street_num: String,
    #[serde(rename = "StreetName")]
    pub street_name: String,
    /// Number and name joined by a single space.
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "City")]
    pub city_name: String,
    #[serde(rename = "Region")]
    pub state: String,
    #[serde(rename = "PostalCode")]
    pub zipcode: String,
    #[serde(rename = "Type", default)]
    pub addr_type: AddressType,
}

/// Version byte leading every binary-encoded [`StreetAddr`].
const ENCODING_VERSION: u8 = 1;

impl StreetAddr {
    /// Build the canonical form from a structured user address.
    ///
    /// The street is split into number and name the same way as
    /// [`parse_address`]; city, state and zip are copied verbatim.
    #[must_use]
    pub fn from_user_address(addr: &UserAddress) -> Self {
        let (street_num, street_name) = split_street(&addr.street);
        Self {
            street: join_street(&street_num, &street_name),
            addr_type: AddressType::classify(&street_name),
            street_num,
            street_name,
            city_name: addr.city_name.clone(),
            state: addr.region.clone(),
            zipcode: addr.postal_code.clone(),
        }
    }

    /// Canonicalize any [`Address`] through its accessors.
    #[must_use]
    pub fn from_address<A: Address + ?Sized>(addr: &A) -> Self {
        Self::from_user_address(&UserAddress {
            street: addr.line_one().to_owned(),
            city_name: addr.city().to_owned(),
            region: addr.state_code().to_owned(),
            postal_code: addr.zip().to_owned(),
        })
    }

    /// Encode into the fixed binary layout used by the address book.
    ///
    /// Layout: one version byte, then each field as a big-endian `u16` length
    /// followed by its UTF-8 bytes, in declaration order with the address
    /// type last.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::FieldTooLong`] if a field exceeds `u16::MAX` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AddressError> {
        let fields = [
            self.street_num.as_str(),
            self.street_name.as_str(),
            self.street.as_str(),
            self.city_name.as_str(),
            self.state.as_str(),
            self.zipcode.as_str(),
            self.addr_type.as_str(),
        ];

        let mut buf = Vec::with_capacity(1 + fields.iter().map(|f| f.len() + 2).sum::<usize>());
        buf.push(ENCODING_VERSION);
        for field in fields {
            let len = u16::try_from(field.len()).map_err(|_| AddressError::FieldTooLong(field.len()))?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(field.as_bytes());
        }
        Ok(buf)
    }

    /// Decode an address written by [`StreetAddr::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are truncated, carry an unknown version,
    /// or contain invalid UTF-8 or an unknown address type.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let (&version, mut rest) = bytes.split_first().ok_or(AddressError::Truncated)?;
        if version != ENCODING_VERSION {
            return Err(AddressError::UnsupportedVersion(version));
        }

        let street_num = read_field(&mut rest)?.to_owned();
        let street_name = read_field(&mut rest)?.to_owned();
        let street = read_field(&mut rest)?.to_owned();
        let city_name = read_field(&mut rest)?.to_owned();
        let state = read_field(&mut rest)?.to_owned();
        let zipcode = read_field(&mut rest)?.to_owned();
        let addr_type = read_field(&mut rest)?.parse()?;

        Ok(Self {
            street_num,
            street_name,
            street,
            city_name,
            state,
            zipcode,
            addr_type,
        })
    }
}

impl Address for StreetAddr {
    fn line_one(&self) -> &str {
        &self.street
    }

    fn city(&self) -> &str {
        &self.city_name
    }

    fn state_code(&self) -> &str {
        &self.state
    }

    fn zip(&self) -> &str {
        &self.zipcode
    }
}

impl fmt::Display for StreetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.line_one(), self.locality())
    }
}

impl std::str::FromStr for StreetAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Parse a free-text `"<number> <street name> <City>, <ST> <ZIP>"` line.
///
/// The text before the first comma is split on whitespace: the leading
/// numeric token is the street number, the last token is the city and
/// everything between is the street name. After the comma come exactly a
/// two-letter state and a five-digit zip. Multi-word city names therefore
/// fold their leading words into the street name.
///
/// # Errors
///
/// Returns an [`AddressError`] naming the first component that is missing or
/// malformed.
pub fn parse_address(raw: &str) -> Result<StreetAddr, AddressError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AddressError::Empty);
    }

    let (street_part, locality) = raw.split_once(',').ok_or(AddressError::MissingLocality)?;

    let mut tokens: Vec<&str> = street_part.split_whitespace().collect();
    let city = tokens.pop().ok_or(AddressError::MissingCity)?;
    let first = tokens.first().ok_or(AddressError::MissingStreet)?;
    if !is_digits(first) {
        return Err(AddressError::InvalidStreetNumber((*first).to_owned()));
    }
    let (street_num, street_name) = split_street(&tokens.join(" "));
    if street_name.is_empty() {
        return Err(AddressError::MissingStreetName);
    }

    let mut rest = locality.split_whitespace();
    let state = rest.next().ok_or(AddressError::MissingState)?;
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AddressError::InvalidState(state.to_owned()));
    }
    let zip = rest.next().ok_or(AddressError::MissingZip)?;
    if zip.len() != 5 || !is_digits(zip) {
        return Err(AddressError::InvalidZip(zip.to_owned()));
    }
    if let Some(extra) = rest.next() {
        return Err(AddressError::TrailingText(extra.to_owned()));
    }

    Ok(StreetAddr {
        street: join_street(&street_num, &street_name),
        addr_type: AddressType::classify(&street_name),
        street_num,
        street_name,
        city_name: city.to_owned(),
        state: state.to_ascii_uppercase(),
        zipcode: zip.to_owned(),
    })
}

/// Split a street into its leading number and the remaining name.
///
/// A street without a numeric first token has an empty number.
fn split_street(street: &str) -> (String, String) {
    let mut tokens = street.split_whitespace().peekable();
    let num = match tokens.peek() {
        Some(first) if is_digits(first) => tokens.next().unwrap_or_default().to_owned(),
        _ => String::new(),
    };
    let name = tokens.collect::<Vec<_>>().join(" ");
    (num, name)
}

fn join_street(num: &str, name: &str) -> String {
    match (num.is_empty(), name.is_empty()) {
        (true, _) => name.to_owned(),
        (false, true) => num.to_owned(),
        (false, false) => format!("{num} {name}"),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn read_field<'a>(buf: &mut &'a [u8]) -> Result<&'a str, AddressError> {
    let (len, rest) = buf.split_first_chunk::<2>().ok_or(AddressError::Truncated)?;
    let len = usize::from(u16::from_be_bytes(*len));
    let (field, rest) = rest.split_at_checked(len).ok_or(AddressError::Truncated)?;
    *buf = rest;
    std::str::from_utf8(field).map_err(|_| AddressError::InvalidUtf8)
}
