// migration/src/main.rs

use migration::Migrator;
use sea_orm_migration::prelude::*;

// sea-orm-migration が提供するCLI (up / down / fresh / status)
#[async_std::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
