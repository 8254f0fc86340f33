//! Entity snapshot builder and its JSON encoding.
//!
//! # Invariants
//! - Row order is exactly what the repository returned; nothing re-sorts.
//! - Encoding is a pure function of the snapshot: same rows, same bytes.

use crate::model::account::{Client, Manager};
use crate::model::atm::Atm;
use crate::model::card::Card;
use crate::model::entity::EntityKind;
use crate::model::service::BankService;
use crate::repo::bank_repo::{BankRepository, RepoResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

/// Indentation of exported files, kept from the historical backup format.
const JSON_INDENT: &[u8] = b"   ";

/// Full, point-in-time copy of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Managers(Vec<Manager>),
    Clients(Vec<Client>),
    Cards(Vec<Card>),
    Atms(Vec<Atm>),
    Services(Vec<BankService>),
}

impl Snapshot {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Managers(_) => EntityKind::Managers,
            Self::Clients(_) => EntityKind::Clients,
            Self::Cards(_) => EntityKind::Cards,
            Self::Atms(_) => EntityKind::Atms,
            Self::Services(_) => EntityKind::Services,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Managers(rows) => rows.len(),
            Self::Clients(rows) => rows.len(),
            Self::Cards(rows) => rows.len(),
            Self::Atms(rows) => rows.len(),
            Self::Services(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the rows as an indented JSON array of flat objects.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::Managers(rows) => encode_pretty(rows),
            Self::Clients(rows) => encode_pretty(rows),
            Self::Cards(rows) => encode_pretty(rows),
            Self::Atms(rows) => encode_pretty(rows),
            Self::Services(rows) => encode_pretty(rows),
        }
    }
}

/// Reads the whole table behind `kind`.
pub fn build_snapshot<R: BankRepository>(repo: &R, kind: EntityKind) -> RepoResult<Snapshot> {
    let snapshot = match kind {
        EntityKind::Managers => Snapshot::Managers(repo.managers()?),
        EntityKind::Clients => Snapshot::Clients(repo.clients()?),
        EntityKind::Cards => Snapshot::Cards(repo.cards()?),
        EntityKind::Atms => Snapshot::Atms(repo.atms()?),
        EntityKind::Services => Snapshot::Services(repo.services()?),
    };
    Ok(snapshot)
}

fn encode_pretty<T: Serialize>(rows: &[T]) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    rows.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::atm::Atm;
    use crate::model::entity::EntityKind;
    use crate::model::service::BankService;

    #[test]
    fn empty_snapshot_encodes_as_empty_array() {
        let bytes = Snapshot::Cards(Vec::new()).to_json_bytes().unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn atms_encode_with_three_space_indent() {
        let snapshot = Snapshot::Atms(vec![Atm {
            id: 1,
            city: "Dushanbe".to_string(),
            district: "Sino".to_string(),
            street: "Bokhtar St 35".to_string(),
        }]);

        let text = String::from_utf8(snapshot.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            "[\n   {\n      \"Id\": 1,\n      \"City\": \"Dushanbe\",\n      \"District\": \"Sino\",\n      \"Street\": \"Bokhtar St 35\"\n   }\n]"
        );
        assert_eq!(snapshot.kind(), EntityKind::Atms);
    }

    #[test]
    fn encoding_is_deterministic() {
        let snapshot = Snapshot::Services(vec![
            BankService {
                id: 2,
                name: "Internet".to_string(),
                balance: 0,
            },
            BankService {
                id: 1,
                name: "Mobile top-up".to_string(),
                balance: 150,
            },
        ]);

        let first = snapshot.to_json_bytes().unwrap();
        let second = snapshot.clone().to_json_bytes().unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        let internet = text.find("Internet").unwrap();
        let top_up = text.find("Mobile top-up").unwrap();
        assert!(internet < top_up, "row order must be preserved");
    }
}
