//! Component custom id codec.
//!
//! Buttons and modals carry a single string of at most 100 characters. We pack
//! a category, an action, the originating guild, a cooldown and optional extra
//! arguments into it, separated by [`DELIMITER`]:
//!
//! ```text
//! settings§toggle-tickets§42§30§
//! clan-invite§accept§42§10§ABC123
//! ```
//!
//! With no extra arguments the encoded form keeps a trailing delimiter, so every
//! id has at least five fields.

use std::{fmt, str::FromStr, time::Duration};
use thiserror::Error;

/// Field separator. Never valid inside a field.
pub const DELIMITER: char = '§';

/// Discord's ceiling for component custom ids, in characters.
pub const MAX_CUSTOM_ID_LEN: usize = 100;

/// Number of fixed fields before the extra arguments.
const FIXED_FIELDS: usize = 4;

/// Domain an interaction action belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomIdCategory {
    /// Guild settings toggles
    Settings,
    /// Support tickets
    Ticket,
    /// Clan management
    Clan,
    /// Clan invitations
    ClanInvite,
}

impl CustomIdCategory {
    /// All known categories.
    pub const ALL: [Self; 4] = [Self::Settings, Self::Ticket, Self::Clan, Self::ClanInvite];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Ticket => "ticket",
            Self::Clan => "clan",
            Self::ClanInvite => "clan-invite",
        }
    }
}

impl fmt::Display for CustomIdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomIdCategory {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

/// Raised when a custom id cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A field contains the delimiter
    #[error("field `{field}` contains the delimiter")]
    ContainsDelimiter {
        /// Offending field
        field: &'static str,
    },
    /// A required field (or an extra argument) is empty
    #[error("field `{field}` is empty")]
    EmptyField {
        /// Offending field
        field: &'static str,
    },
    /// Encoded id does not fit in a component
    #[error("custom id is {length} characters, limit is {max}")]
    TooLong {
        /// Encoded length in characters
        length: usize,
        /// Allowed maximum
        max: usize,
    },
}

/// Raised when an incoming custom id is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer fields than the fixed layout needs
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount {
        /// Minimum field count
        expected: usize,
        /// Fields present
        found: usize,
    },
    /// Category is not one we know
    #[error("unknown category `{value}`")]
    UnknownCategory {
        /// Raw category field
        value: String,
    },
    /// Action or guild id is empty
    #[error("field `{field}` is empty")]
    EmptyField {
        /// Offending field
        field: &'static str,
    },
    /// Cooldown is not a non-negative integer
    #[error("invalid cooldown `{value}`")]
    InvalidCooldown {
        /// Raw cooldown field
        value: String,
    },
    /// An extra argument is empty
    #[error("extra argument {index} is empty")]
    EmptyExtra {
        /// Position within the extra arguments
        index: usize,
    },
}

/// Decoded form of a component custom id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCustomId {
    /// Domain of the action
    pub category: CustomIdCategory,
    /// Target column/field or control keyword
    pub action: String,
    /// Originating guild
    pub guild_id: String,
    /// Seconds between permitted invocations by the same user
    pub cooldown: u32,
    /// Auxiliary arguments, in order
    pub extra: Vec<String>,
}

impl ParsedCustomId {
    /// Key used for both registry lookup and cooldown tracking: `category:action`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        format!("{}:{}", self.category, self.action)
    }

    /// Cooldown as a duration.
    #[must_use]
    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.cooldown))
    }

    /// First extra argument, if any.
    #[must_use]
    pub fn first_extra(&self) -> Option<&str> {
        self.extra.first().map(String::as_str)
    }

    /// Re-encodes this id.
    pub fn encode(&self) -> Result<String, EncodeError> {
        encode(
            self.category,
            &self.action,
            &self.guild_id,
            self.cooldown,
            &self.extra,
        )
    }
}

fn check_field(field: &'static str, value: &str) -> Result<(), EncodeError> {
    if value.is_empty() {
        return Err(EncodeError::EmptyField { field });
    }
    if value.contains(DELIMITER) {
        return Err(EncodeError::ContainsDelimiter { field });
    }
    Ok(())
}

/// Encodes the fields of a component custom id.
///
/// Fails if any field contains [`DELIMITER`], if the action, guild id or any
/// extra argument is empty, or if the result exceeds [`MAX_CUSTOM_ID_LEN`].
pub fn encode<S: AsRef<str>>(
    category: CustomIdCategory,
    action: &str,
    guild_id: &str,
    cooldown: u32,
    extra: &[S],
) -> Result<String, EncodeError> {
    check_field("action", action)?;
    check_field("guild_id", guild_id)?;
    for arg in extra {
        check_field("extra", arg.as_ref())?;
    }

    let cooldown = cooldown.to_string();
    let mut fields = vec![category.as_str(), action, guild_id, cooldown.as_str()];
    if extra.is_empty() {
        fields.push("");
    } else {
        fields.extend(extra.iter().map(AsRef::as_ref));
    }

    let encoded = fields.join(&DELIMITER.to_string());
    let length = encoded.chars().count();
    if length > MAX_CUSTOM_ID_LEN {
        return Err(EncodeError::TooLong {
            length,
            max: MAX_CUSTOM_ID_LEN,
        });
    }
    Ok(encoded)
}

/// Decodes a raw custom id. Exact inverse of [`encode`] for valid input.
pub fn decode(raw: &str) -> Result<ParsedCustomId, DecodeError> {
    let fields: Vec<&str> = raw.split(DELIMITER).collect();
    if fields.len() <= FIXED_FIELDS {
        return Err(DecodeError::FieldCount {
            expected: FIXED_FIELDS + 1,
            found: fields.len(),
        });
    }

    let category = fields[0].parse::<CustomIdCategory>()?;
    let action = fields[1];
    if action.is_empty() {
        return Err(DecodeError::EmptyField { field: "action" });
    }
    let guild_id = fields[2];
    if guild_id.is_empty() {
        return Err(DecodeError::EmptyField { field: "guild_id" });
    }
    let cooldown = parse_cooldown(fields[3]).ok_or_else(|| DecodeError::InvalidCooldown {
        value: fields[3].to_string(),
    })?;

    let extra = match &fields[FIXED_FIELDS..] {
        [""] => Vec::new(),
        args => {
            if let Some(index) = args.iter().position(|arg| arg.is_empty()) {
                return Err(DecodeError::EmptyExtra { index });
            }
            args.iter().map(ToString::to_string).collect()
        }
    };

    Ok(ParsedCustomId {
        category,
        action: action.to_string(),
        guild_id: guild_id.to_string(),
        cooldown,
        extra,
    })
}

/// Cooldowns are plain decimal digits with no sign or leading zero, so each
/// value has exactly one wire form.
fn parse_cooldown(raw: &str) -> Option<u32> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if !canonical {
        return None;
    }
    raw.parse().ok()
}
