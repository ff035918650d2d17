use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::assets::Assets;

/// Static owner details shown beside the form.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteProfile {
    pub name: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub location: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SiteError {
    AssetMissing(&'static str),
    Parse(String),
    EmptyField(&'static str),
}

impl Display for SiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteError::AssetMissing(path) => write!(f, "embedded asset `{path}` is missing"),
            SiteError::Parse(error) => write!(f, "failed to parse site profile: {error}"),
            SiteError::EmptyField(field) => write!(f, "site profile field `{field}` is empty"),
        }
    }
}

impl std::error::Error for SiteError {}

impl SiteProfile {
    pub fn load() -> Result<Self, SiteError> {
        let source = Assets::text(Assets::SITE_PROFILE)
            .ok_or(SiteError::AssetMissing(Assets::SITE_PROFILE))?;
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, SiteError> {
        let profile: Self =
            toml::from_str(source).map_err(|error| SiteError::Parse(error.to_string()))?;
        for (field, value) in [("name", &profile.name), ("email", &profile.email)] {
            if value.trim().is_empty() {
                return Err(SiteError::EmptyField(field));
            }
        }
        Ok(profile)
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}
