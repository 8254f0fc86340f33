//! Account and card issuing use-cases.
//!
//! # Responsibility
//! - Hash credentials before they reach the repository.
//! - Issue cards under the next free PAN for an existing client.
//!
//! # Invariants
//! - PAN allocation is a read followed by an insert; the UNIQUE constraint
//!   on `clients_cards.pan` is what rejects a concurrent duplicate.

use crate::auth::AuthError;
use crate::model::account::{NewAccount, Role};
use crate::model::card::NewCard;
use crate::repo::bank_repo::{BankRepository, RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// PAN given to the very first card, when no card exists to count from.
pub const FIRST_PAN: i64 = 2_021_600_000_000_000;

/// Card parameters chosen by the issuing manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCardRequest {
    pub client_id: i64,
    pub pin: i64,
    pub cvv: i64,
    pub validity: i64,
    pub opening_balance: i64,
}

#[derive(Debug)]
pub enum AccountServiceError {
    /// Referenced client does not exist.
    ClientNotFound(i64),
    Auth(AuthError),
    Repo(RepoError),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientNotFound(id) => write!(f, "client not found: {id}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ClientNotFound(_) => None,
            Self::Auth(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<AuthError> for AccountServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Use-case wrapper for account registration, sign-in and card issuing.
pub struct AccountService<R: BankRepository> {
    repo: R,
}

impl<R: BankRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers an account under `role` and returns its id.
    pub fn register(
        &self,
        role: Role,
        name: &str,
        surname: &str,
        login: &str,
        password: &str,
    ) -> AccountServiceResult<i64> {
        let account = NewAccount::new(name, surname, login, password)?;
        let id = match role {
            Role::Manager => self.repo.insert_manager(&account)?,
            Role::Client => self.repo.insert_client(&account)?,
        };
        info!("event=account_register module=service status=ok role={role:?} id={id}");
        Ok(id)
    }

    pub fn sign_in(&self, role: Role, login: &str, password: &str) -> RepoResult<bool> {
        self.repo.sign_in(role, login, password)
    }

    /// Issues a card to an existing client under the next PAN.
    ///
    /// The holder name is `"<NAME> <SURNAME>"` upper-cased, as embossed.
    pub fn issue_card(&self, request: &IssueCardRequest) -> AccountServiceResult<NewCard> {
        let (name, surname) = self
            .repo
            .client_full_name(request.client_id)?
            .ok_or(AccountServiceError::ClientNotFound(request.client_id))?;

        let pan = match self.repo.next_pan() {
            Ok(pan) => pan,
            Err(RepoError::NoCardsIssued) => FIRST_PAN,
            Err(err) => return Err(err.into()),
        };

        let card = NewCard {
            pan,
            pin: request.pin,
            balance: request.opening_balance,
            holder_name: format!("{name} {surname}").to_uppercase(),
            cvv: request.cvv,
            validity: request.validity,
            client_id: request.client_id,
        };
        self.repo.insert_card(&card)?;

        info!(
            "event=card_issue module=service status=ok client_id={}",
            request.client_id
        );
        Ok(card)
    }
}
