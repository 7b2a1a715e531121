use lingo_entity::user::Model as UserModel;
use sea_orm::DatabaseConnection;

#[allow(dead_code)]
pub async fn create_test_user(db: &DatabaseConnection) -> UserModel {
    lingo_db::user::Mutation::create_user(db, "test_user", "hash", "salt")
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn create_named_user(db: &DatabaseConnection, username: &str) -> UserModel {
    lingo_db::user::Mutation::create_user(db, username, "hash", "salt")
        .await
        .unwrap()
}
