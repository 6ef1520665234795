pub use sea_orm_migration::prelude::*;

mod m20250701_000001_create_users_table;
mod m20250701_000002_create_tasks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_000001_create_users_table::Migration),
            Box::new(m20250701_000002_create_tasks_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_users_before_tasks() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "m20250701_000001_create_users_table",
                "m20250701_000002_create_tasks_table"
            ]
        );
    }
}
