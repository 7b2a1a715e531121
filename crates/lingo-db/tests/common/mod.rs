pub mod user;

use sea_orm::{DbConn, DbErr};

pub async fn setup_schema(db: &DbConn) -> Result<(), DbErr> {
    lingo_db::migration::setup_schema(db).await
}
