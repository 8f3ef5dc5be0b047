//! Access Decision Service — channel membership lookup.
//!
//! One bounded HTTP call to the Bot API's `getChatMember` per decision, no
//! retries, and a fail-soft contract: any error in the lookup resolves to
//! "not a member". "Unable to confirm membership" and "not a member" are
//! deliberately indistinguishable past this boundary — the gate never fails
//! open.

pub mod client;
pub mod error;
pub mod status;

pub use client::BotApiClient;
pub use error::MembershipError;
pub use status::ChatMemberStatus;
