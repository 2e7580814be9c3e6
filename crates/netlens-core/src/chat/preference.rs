//! Requested verbosity of assistant replies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Response length the assistant is asked for. Changed only through the
/// `/corto`, `/normal` and `/detallado` commands.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserPreference {
    Corto,
    #[default]
    Normal,
    Detallado,
}
