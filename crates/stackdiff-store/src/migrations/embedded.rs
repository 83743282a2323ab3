//! SQL shipped inside the binary

/// One schema step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Every migration, in application order. Ids never change once released.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_diffs",
        sql: include_str!("../../migrations/001_diffs.sql"),
    },
    Migration {
        id: "002_users",
        sql: include_str!("../../migrations/002_users.sql"),
    },
];
