pub mod db;

pub use db::{
    create_db, delete_import_profile, get_all_categories, get_expense_by_id, get_import_profiles,
    insert_category, insert_expense, save_import_profile, seed_default_categories, DbPool,
    ImportProfile, SqliteExpenseStore,
};
