//! User-facing strings and the locales they come in.

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

mod relative;

pub use relative::format_relative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// Confirmation shown after a tap has been stored.
    pub fn recorded_notice(&self, label: &str) -> String {
        match self {
            Locale::Es => format!("Registrado: {label}"),
            Locale::En => format!("Recorded: {label}"),
        }
    }

    pub fn empty_list(&self) -> &'static str {
        match self {
            Locale::Es => "Sin registros todavía",
            Locale::En => "Nothing logged yet",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Ok(Locale::Es),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            other => bail!("unsupported locale '{other}'"),
        }
    }
}
