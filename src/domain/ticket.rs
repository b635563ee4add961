//! Support tickets

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// An entry of the append-only ticket log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub title: String,
    pub description: String,
    pub opened_at: DateTime<Utc>,
}

impl Ticket {
    /// Open a ticket now.
    pub fn open(title: &str, description: &str) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("ticket title must not be empty"));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            opened_at: Utc::now().trunc_subsecs(6),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ticket() {
        let before = Utc::now().trunc_subsecs(6);
        let ticket = Ticket::open("Grinder broken", " makes noise ").unwrap();

        assert_eq!(ticket.title, "Grinder broken");
        assert_eq!(ticket.description, "makes noise");
        assert!(ticket.opened_at >= before);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(Ticket::open("", "anything").is_err());
    }
}
