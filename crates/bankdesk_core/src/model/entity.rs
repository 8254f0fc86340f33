//! Entity kinds and their fixed export order.

use std::fmt::{Display, Formatter};

/// One exportable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Managers,
    Clients,
    Cards,
    Atms,
    Services,
}

impl EntityKind {
    /// Export order used by the orchestrator.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Managers,
        EntityKind::Clients,
        EntityKind::Cards,
        EntityKind::Atms,
        EntityKind::Services,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Managers => "managers",
            Self::Clients => "clients",
            Self::Cards => "clientsCards",
            Self::Atms => "atms",
            Self::Services => "services",
        }
    }

    /// Current export file name inside the backup directory.
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Prefix of rotated copies, e.g. `managersDataBackup`.
    pub fn backup_prefix(self) -> String {
        format!("{}DataBackup", self.as_str())
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
