use super::error::Error;
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {}", user_model.email);

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(user_model.email),
        name: Set(user_model.name),
        password: Set(generate_hash(user_model.password)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Returns the user with `email` when `password` matches their stored hash.
///
/// An unknown email and a wrong password fail identically with
/// `RecordUnauthenticated`.
pub async fn authenticate(
    db: &impl ConnectionTrait,
    email: &str,
    password: &str,
) -> Result<Model, Error> {
    let user = find_by_email(db, email).await?.ok_or_else(|| {
        warn!("Login attempt for unknown email");
        Error::unauthenticated()
    })?;

    verify_password(password, &user.password)?;
    Ok(user)
}

pub fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    password_auth::verify_password(password_to_verify, password_hash)
        .map_err(|_| Error::unauthenticated())
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}
