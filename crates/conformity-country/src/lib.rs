//! # conformity-country — Country Code Field
//!
//! A leaf field restricting values to ISO 3166-1 alpha-2 codes of
//! currently assigned countries. It is an ordinary [`Field`] built from
//! the public surface of `conformity-core` and `conformity-fields`, with
//! no access to anything internal.

use conformity_core::{ConfigError, Field, Introspection, ValidationError, Value};
use conformity_fields::ConstantField;

/// Officially assigned ISO 3166-1 alpha-2 codes.
pub const ISO_3166_ALPHA_2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Accepts ISO 3166-1 alpha-2 country codes.
#[derive(Debug, Clone)]
pub struct CountryCodeField {
    // `None` when the filter rejected every code.
    codes: Option<ConstantField>,
    description: Option<String>,
}

impl CountryCodeField {
    /// Every assigned code.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] the constant field raises for the code table.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_filter(|_| true)
    }

    /// Only the codes `keep` accepts. The filter runs once, here.
    ///
    /// A filter that rejects every code leaves a field that accepts
    /// nothing; it is not a configuration error.
    ///
    /// # Errors
    ///
    /// Any other [`ConfigError`] the constant field raises.
    pub fn with_filter(keep: impl Fn(&str) -> bool) -> Result<Self, ConfigError> {
        let codes = non_empty(ConstantField::filtered(ISO_3166_ALPHA_2.iter().copied(), |v| {
            v.as_str().is_some_and(|code| keep(code))
        }))?;
        Ok(Self {
            codes,
            description: None,
        })
    }

    /// Attach a human-readable description, reported by introspection.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The codes this field accepts.
    pub fn valid_codes(&self) -> impl Iterator<Item = &str> {
        self.codes
            .iter()
            .flat_map(|c| c.values())
            .filter_map(Value::as_str)
    }
}

// An empty filtered set means "accept nothing"; every other error is real.
fn non_empty(
    built: Result<ConstantField, ConfigError>,
) -> Result<Option<ConstantField>, ConfigError> {
    match built {
        Ok(codes) => Ok(Some(codes)),
        Err(ConfigError::EmptyConstant) => Ok(None),
        Err(err) => Err(err),
    }
}

impl Field for CountryCodeField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        if value.as_str().is_none() {
            return vec![ValidationError::new("Not a unicode string")];
        }
        if !self.codes.as_ref().is_some_and(|c| c.contains(value)) {
            return vec![ValidationError::new("Not a valid country code").with_pointer("value")];
        }
        Vec::new()
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("country_code_field")
            .with_opt("description", self.description.clone())
            .with("valid_country_codes", self.valid_codes().collect::<Vec<_>>())
    }
}
