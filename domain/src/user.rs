use crate::error::{EntityErrorKind, Error};
use crate::{jwt, users};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

pub use entity_api::user::{find_by_email, find_by_id, generate_hash};

/// A freshly authenticated user together with their access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: users::Model,
    pub access_token: String,
}

/// Creates an account for `email` and signs it in.
///
/// Fails with `Invalid` for an obviously malformed email or an empty password and
/// with `Conflict` when the email is already registered.
pub async fn register(
    db: &DatabaseConnection,
    config: &Config,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<Session, Error> {
    let email = email.trim();
    if !is_plausible_email(email) || password.is_empty() {
        warn!("Rejected registration with invalid email or empty password");
        return Err(Error::entity(EntityErrorKind::Invalid));
    }

    if find_by_email(db, email).await?.is_some() {
        info!("Registration attempted for an existing email");
        return Err(Error::entity(EntityErrorKind::Conflict));
    }

    let now = chrono::Utc::now();
    let user = entity_api::user::create(
        db,
        users::Model {
            id: Default::default(),
            email: email.to_string(),
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            password: password.to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;
    info!("Registered user {}", user.id);

    let access_token = jwt::issue_access_token(config, &user.email)?;
    Ok(Session { user, access_token })
}

/// Verifies the credentials and issues a new access token.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<Session, Error> {
    let user = entity_api::user::authenticate(db, email.trim(), password).await?;
    debug!("User {} logged in", user.id);

    let access_token = jwt::issue_access_token(config, &user.email)?;
    Ok(Session { user, access_token })
}

/// Resolves a bearer token to the user it was issued for.
///
/// A bad or expired token and a token for a since-deleted user are all `Unauthenticated`.
pub async fn find_by_access_token(
    db: &DatabaseConnection,
    config: &Config,
    token: &str,
) -> Result<users::Model, Error> {
    let claims = jwt::decode_access_token(config, token)?;

    find_by_email(db, &claims.sub).await?.ok_or_else(|| {
        warn!("Access token subject no longer exists");
        Error::entity(EntityErrorKind::Unauthenticated)
    })
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_db_tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use crate::Id;
    use clap::Parser;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn config() -> Config {
        Config::parse_from(["insightboard"]).set_jwt_secret("test-secret".to_string())
    }

    fn user(password_hash: &str) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            password: password_hash.to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn entity_kind(err: &Error) -> Option<&EntityErrorKind> {
        match &err.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(kind)) => Some(kind),
            _ => None,
        }
    }

    #[tokio::test]
    async fn register_creates_user_and_issues_token() -> Result<(), Error> {
        let created = user("hash");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<users::Model>::new()])
            .append_query_results(vec![vec![created.clone()]])
            .into_connection();
        let config = config();

        let session = register(&db, &config, " alice@example.com ", "s3cret", None).await?;

        assert_eq!(session.user.id, created.id);
        let claims = jwt::decode_access_token(&config, &session.access_token)?;
        assert_eq!(claims.sub, "alice@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_existing_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user("hash")]])
            .into_connection();

        let err = register(&db, &config(), "alice@example.com", "s3cret", None)
            .await
            .unwrap_err();

        assert_eq!(entity_kind(&err), Some(&EntityErrorKind::Conflict));
    }

    #[tokio::test]
    async fn register_rejects_invalid_input_without_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = register(&db, &config(), "alice", "s3cret", None)
            .await
            .unwrap_err();
        assert_eq!(entity_kind(&err), Some(&EntityErrorKind::Invalid));

        let err = register(&db, &config(), "alice@example.com", "", None)
            .await
            .unwrap_err();
        assert_eq!(entity_kind(&err), Some(&EntityErrorKind::Invalid));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let stored = user(&entity_api::user::generate_hash("s3cret".to_string()));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored]])
            .into_connection();

        let err = login(&db, &config(), "alice@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(entity_kind(&err), Some(&EntityErrorKind::Unauthenticated));
    }

    #[tokio::test]
    async fn find_by_access_token_resolves_user() -> Result<(), Error> {
        let stored = user("hash");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored.clone()]])
            .into_connection();
        let config = config();
        let token = jwt::issue_access_token(&config, &stored.email)?;

        let found = find_by_access_token(&db, &config, &token).await?;

        assert_eq!(found.id, stored.id);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_access_token_rejects_deleted_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<users::Model>::new()])
            .into_connection();
        let config = config();
        let token = jwt::issue_access_token(&config, "gone@example.com").unwrap();

        let err = find_by_access_token(&db, &config, &token).await.unwrap_err();

        assert_eq!(entity_kind(&err), Some(&EntityErrorKind::Unauthenticated));
    }
}
