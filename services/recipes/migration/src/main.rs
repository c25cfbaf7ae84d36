use sea_orm_migration::prelude::*;

use recipe_service_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
