use bankdesk_core::db::{apply_schema, open_db_in_memory, Schema};
use bankdesk_core::{
    AccountService, BankRepository, NewAccount, RepoError, Role, SqliteBankRepository,
};
use rusqlite::Connection;

fn ready_conn() -> Connection {
    let conn = open_db_in_memory().unwrap();
    apply_schema(&conn, &Schema::banking()).unwrap();
    conn
}

#[test]
fn correct_password_signs_in() {
    let conn = ready_conn();
    let repo = SqliteBankRepository::new(&conn);
    repo.insert_manager(&NewAccount::new("Jack", "Black", "jack", "password").unwrap())
        .unwrap();
    repo.insert_manager(&NewAccount::new("Max", "Payne", "max", "password2").unwrap())
        .unwrap();

    assert!(repo.sign_in(Role::Manager, "max", "password2").unwrap());
}

#[test]
fn wrong_password_is_a_mismatch_error() {
    let conn = ready_conn();
    let repo = SqliteBankRepository::new(&conn);
    repo.insert_manager(&NewAccount::new("Jack", "Black", "jack", "password").unwrap())
        .unwrap();

    let err = repo.sign_in(Role::Manager, "jack", "12345").unwrap_err();
    assert!(matches!(err, RepoError::PasswordMismatch));
}

#[test]
fn unknown_login_is_not_an_error() {
    let conn = ready_conn();
    let repo = SqliteBankRepository::new(&conn);

    assert!(!repo.sign_in(Role::Manager, "", "").unwrap());
    assert!(!repo.sign_in(Role::Client, "ghost", "secret").unwrap());
}

#[test]
fn roles_do_not_share_credentials() {
    let conn = ready_conn();
    let service = AccountService::new(SqliteBankRepository::new(&conn));
    service
        .register(Role::Client, "Anna", "Karimova", "anna", "pw")
        .unwrap();

    assert!(service.sign_in(Role::Client, "anna", "pw").unwrap());
    assert!(!service.sign_in(Role::Manager, "anna", "pw").unwrap());
}

#[test]
fn missing_table_is_query_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBankRepository::new(&conn);

    let err = repo.sign_in(Role::Manager, "", "").unwrap_err();
    assert!(matches!(err, RepoError::Query(_)));
}

#[test]
fn plaintext_stored_password_is_invalid_data() {
    let conn = ready_conn();
    conn.execute(
        "INSERT INTO managers (name, surname, login, password)
         VALUES ('Legacy', 'Admin', 'admin', 'admin');",
        [],
    )
    .unwrap();
    let repo = SqliteBankRepository::new(&conn);

    let err = repo.sign_in(Role::Manager, "admin", "admin").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn snapshots_never_contain_plaintext() {
    let conn = ready_conn();
    let repo = SqliteBankRepository::new(&conn);
    repo.insert_client(&NewAccount::new("Anna", "Karimova", "anna", "hunter2").unwrap())
        .unwrap();

    let clients = repo.clients().unwrap();
    assert_ne!(clients[0].password, "hunter2");
    assert!(clients[0].password.starts_with("$argon2id$"));
}
