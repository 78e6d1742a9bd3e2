//! Voice enumeration.

use serde::{Deserialize, Serialize};

/// Voice preset accepted by the upstream speech API.
///
/// # Examples
///
/// ```
/// use vocetta_core::Voice;
/// use std::str::FromStr;
///
/// let voice = Voice::from_str("coral").unwrap();
/// assert_eq!(voice, Voice::Coral);
/// assert_eq!(voice.as_str(), "coral");
/// assert!(Voice::from_str("robot").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// The "alloy" preset
    #[display("alloy")]
    Alloy,
    /// The "ash" preset
    #[display("ash")]
    Ash,
    /// The "ballad" preset
    #[display("ballad")]
    Ballad,
    /// The "coral" preset
    #[display("coral")]
    Coral,
    /// The "echo" preset
    #[display("echo")]
    Echo,
    /// The "fable" preset
    #[display("fable")]
    Fable,
    /// The "onyx" preset
    #[display("onyx")]
    Onyx,
    /// The "nova" preset
    #[display("nova")]
    Nova,
    /// The "sage" preset
    #[display("sage")]
    Sage,
    /// The "shimmer" preset
    #[display("shimmer")]
    Shimmer,
    /// The "verse" preset
    #[display("verse")]
    Verse,
}

impl Voice {
    /// Convert to the wire identifier sent upstream.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Ash => "ash",
            Voice::Ballad => "ballad",
            Voice::Coral => "coral",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Sage => "sage",
            Voice::Shimmer => "shimmer",
            Voice::Verse => "verse",
        }
    }
}

impl std::str::FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alloy" => Ok(Voice::Alloy),
            "ash" => Ok(Voice::Ash),
            "ballad" => Ok(Voice::Ballad),
            "coral" => Ok(Voice::Coral),
            "echo" => Ok(Voice::Echo),
            "fable" => Ok(Voice::Fable),
            "onyx" => Ok(Voice::Onyx),
            "nova" => Ok(Voice::Nova),
            "sage" => Ok(Voice::Sage),
            "shimmer" => Ok(Voice::Shimmer),
            "verse" => Ok(Voice::Verse),
            _ => Err(format!("Unknown voice: {}", s)),
        }
    }
}
