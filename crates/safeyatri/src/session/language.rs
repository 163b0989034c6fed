use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SessionError;

/// Interface languages offered by the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    En,
    Hi,
    Bn,
    As,
    Ta,
    Te,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hi,
        Language::Bn,
        Language::As,
        Language::Ta,
        Language::Te,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Hi => "HI",
            Language::Bn => "BN",
            Language::As => "AS",
            Language::Ta => "TA",
            Language::Te => "TE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Bn => "Bengali",
            Language::As => "Assamese",
            Language::Ta => "Tamil",
            Language::Te => "Telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        Language::ALL
            .into_iter()
            .find(|language| language.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| SessionError::UnknownLanguage(code.to_string()))
    }
}
