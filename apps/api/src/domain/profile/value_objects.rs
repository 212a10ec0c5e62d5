use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    pub static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Username {
    #[validate(regex(path = *USERNAME_REGEX))]
    pub value: String,
}

impl Username {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let username = Self {
            value: value.trim().to_string(),
        };
        username.validate()?;
        Ok(username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailAddress {
    #[validate(email, length(max = 254))]
    pub value: String,
}

impl EmailAddress {
    /// Emails are compared lower-cased.
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let email = Self {
            value: value.trim().to_lowercase(),
        };
        email.validate()?;
        Ok(email)
    }
}
