//! Chat member status classification.

/// Membership status reported by the Bot API for a (chat, user) pair.
///
/// Statuses the API may grow are preserved in [`ChatMemberStatus::Unknown`]
/// rather than dropped, so logs still show what the authority actually said.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatMemberStatus {
    Creator,
    Administrator,
    Member,
    /// Present in the chat but with restricted permissions. Counts as a
    /// member: a restricted member is still a member (product decision).
    Restricted,
    Left,
    Kicked,
    Unknown(String),
}

impl ChatMemberStatus {
    /// Classify a raw status string from the authority.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "creator" => Self::Creator,
            "administrator" => Self::Administrator,
            "member" => Self::Member,
            "restricted" => Self::Restricted,
            "left" => Self::Left,
            "kicked" => Self::Kicked,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether this status grants access.
    ///
    /// Anything unrecognized is treated as "not a member" — the restrictive
    /// default for statuses this code does not know about.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            Self::Creator | Self::Administrator | Self::Member | Self::Restricted
        )
    }
}

impl std::fmt::Display for ChatMemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Creator => "creator",
            Self::Administrator => "administrator",
            Self::Member => "member",
            Self::Restricted => "restricted",
            Self::Left => "left",
            Self::Kicked => "kicked",
            Self::Unknown(other) => other,
        };
        f.write_str(s)
    }
}
