//! E-mail addresses.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid e-mail address")]
pub struct InvalidEmailAddress;

/// A trimmed, lower-cased address of the form `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEmailAddress`] when the address contains whitespace, does not have
    /// exactly one `@`, or the domain has no interior dot.
    pub fn parse(raw: &str) -> Result<Self, InvalidEmailAddress> {
        let address = raw.trim().to_lowercase();

        if address.is_empty()
            || address.len() > MAX_EMAIL_LEN
            || address.chars().any(char::is_whitespace)
        {
            return Err(InvalidEmailAddress);
        }

        let (local, domain) = address.split_once('@').ok_or(InvalidEmailAddress)?;

        if local.is_empty() || domain.contains('@') {
            return Err(InvalidEmailAddress);
        }

        let has_interior_dot = domain
            .char_indices()
            .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len());

        if !has_interior_dot {
            return Err(InvalidEmailAddress);
        }

        Ok(Self(address))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address with most of the local part hidden, for logs.
    #[must_use]
    pub fn masked(&self) -> String {
        let Some((local, domain)) = self.0.split_once('@') else {
            return "***".to_string();
        };

        let visible: String = local.chars().take(2).collect();

        if local.chars().count() <= 2 {
            format!("***@{domain}")
        } else {
            format!("{visible}***@{domain}")
        }
    }
}

impl FromStr for EmailAddress {
    type Err = InvalidEmailAddress;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
