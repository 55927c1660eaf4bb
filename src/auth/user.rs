use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::password;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Standard,
    Staff,
    Admin,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub password_hash: String,
    /// Set when the password was generated and must be replaced at next login.
    pub change_password: bool,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn new(user_type: UserType, password: &str) -> Result<Self> {
        Ok(Self {
            password_hash: password::hash_password(password)?,
            change_password: false,
            user_type,
            created: Utc::now(),
        })
    }

    pub fn authenticate(&self, password: &str) -> bool {
        password::authenticate(&self.password_hash, password)
    }

    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.password_hash = password::hash_password(password)?;
        self.change_password = false;
        Ok(())
    }

    /// Replaces the password with a generated one the user must change after
    /// logging in. The account is untouched if generation fails.
    pub fn reset_password(&mut self) -> Result<String> {
        let (password, hash) = password::reset_password()?;
        self.password_hash = hash;
        self.change_password = true;
        Ok(password)
    }
}
