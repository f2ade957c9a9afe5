use std::{error::Error, fs};

use ron::{Options, extensions::Extensions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct KilnConfig {
    pub version: f32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    /// where the build history json lives, default `./kiln-build-history.json`
    #[serde(default)]
    pub history_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryConfig {
    /// stable id; generated when the file leaves it out
    #[serde(default)]
    pub uuid: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl KilnConfig {
    pub fn from_file(file_path: &str) -> Result<Self, Box<dyn Error>> {
        Self::parse(&fs::read_to_string(file_path)?)
    }

    pub fn parse(s: &str) -> Result<Self, Box<dyn Error>> {
        let options = Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .with_default_extension(Extensions::UNWRAP_NEWTYPES)
            .with_default_extension(Extensions::UNWRAP_VARIANT_NEWTYPES);
        Ok(options.from_str(s)?)
    }
}

impl Default for KilnConfig {
    fn default() -> Self {
        Self {
            version: crate::CONFIG_VERSION,
            name: None,
            description: None,
            categories: Vec::new(),
            connections: Vec::new(),
            history_file: None,
        }
    }
}
