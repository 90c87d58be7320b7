use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An addressable kind of notification event, scoped to an application
/// within a bundle.
///
/// Entries are always complete records: the selection store never holds a
/// partially populated event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub application_display_name: String,
    pub bundle_display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Bulk selection commands offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionCommand {
    /// Select every event type matching the current filters, across all pages.
    All,
    /// Select every event type on the currently loaded page.
    Page,
    /// Clear the selection.
    None,
}

impl SelectionCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionCommand::All => "all",
            SelectionCommand::Page => "page",
            SelectionCommand::None => "none",
        }
    }
}

impl fmt::Display for SelectionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SelectionCommand::All),
            "page" => Ok(SelectionCommand::Page),
            "none" => Ok(SelectionCommand::None),
            other => Err(format!(
                "unknown selection command '{other}' (expected all, page or none)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_command_parse_is_case_insensitive() {
        assert_eq!("ALL".parse::<SelectionCommand>(), Ok(SelectionCommand::All));
        assert_eq!(" page ".parse::<SelectionCommand>(), Ok(SelectionCommand::Page));
        assert!("some".parse::<SelectionCommand>().is_err());
    }

    #[test]
    fn test_event_type_omits_missing_description() {
        let event = EventType {
            id: "e1".to_string(),
            name: "new-recommendation".to_string(),
            display_name: "New recommendation".to_string(),
            application_display_name: "Advisor".to_string(),
            bundle_display_name: "Red Hat Enterprise Linux".to_string(),
            description: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("description"));
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
