pub use sea_orm_migration::prelude::*;

mod m20251019_000001_create_intranet_schema;
mod m20251019_000002_intranet_indexes;
mod m20251019_000003_lab_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_create_intranet_schema::Migration),
            Box::new(m20251019_000002_intranet_indexes::Migration),
            Box::new(m20251019_000003_lab_records::Migration),
        ]
    }
}
