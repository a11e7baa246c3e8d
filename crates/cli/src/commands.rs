use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use impensa_core::{Category, Money};
use impensa_import::{
    commit_rows, preview_with_mapping, tokenize, ColumnMapping, DateOrder, ImportPreview,
};
use impensa_storage::{DbPool, SqliteExpenseStore};

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file exported from a bank, card issuer, or spreadsheet.
    pub file: PathBuf,
    /// Override the detected date column (0-based).
    #[arg(long, value_name = "N")]
    pub date_col: Option<usize>,
    /// Override the detected amount column (0-based).
    #[arg(long, value_name = "N")]
    pub amount_col: Option<usize>,
    /// Override the detected description column (0-based).
    #[arg(long, value_name = "N")]
    pub description_col: Option<usize>,
    /// Override the detected category column (0-based).
    #[arg(long, value_name = "N")]
    pub category_col: Option<usize>,
    /// Resolve ambiguous dates like 01/02/2024 day-first.
    #[arg(long)]
    pub day_first: bool,
    /// Start from a saved column-mapping profile instead of detection.
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
    /// Save the mapping in effect under this profile name.
    #[arg(long, value_name = "NAME")]
    pub save_profile: Option<String>,
    /// Persist the valid rows instead of only previewing them.
    #[arg(long)]
    pub commit: bool,
}

pub async fn run_import(
    pool: &DbPool,
    args: ImportArgs,
    settings: &Settings,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let categories = impensa_storage::get_all_categories(pool).await?;
    let file = tokenize(&text);

    // Profile (if named) replaces detection; per-column flags override either.
    let (mut mapping, mut order) = match &args.profile {
        Some(name) => {
            let profile = impensa_storage::get_import_profiles(pool)
                .await?
                .into_iter()
                .find(|p| p.name == *name)
                .with_context(|| format!("no import profile named '{name}'"))?;
            (profile.mapping, profile.date_order)
        }
        None => (ColumnMapping::infer(&file.header), settings.date_order),
    };
    if args.day_first {
        order = DateOrder::DayFirst;
    }
    if let Some(column) = args.date_col {
        mapping.date_column = Some(column);
    }
    if let Some(column) = args.amount_col {
        mapping.amount_column = Some(column);
    }
    if let Some(column) = args.description_col {
        mapping.description_column = Some(column);
    }
    if let Some(column) = args.category_col {
        mapping.category_column = Some(column);
    }

    let preview = preview_with_mapping(&text, mapping, &categories, order)?;
    print_preview(&preview, &categories);

    if let Some(name) = &args.save_profile {
        impensa_storage::save_import_profile(pool, name, &preview.mapping, order).await?;
        println!("saved profile '{name}'");
    }

    let valid = preview.valid_rows();
    if args.commit {
        if valid.is_empty() {
            bail!("nothing to import: no rows normalized cleanly");
        }
        let store = SqliteExpenseStore::new(pool.clone());
        let outcome = commit_rows(&store, &valid).await;
        println!(
            "imported {} of {} rows",
            outcome.persisted, outcome.attempted
        );
    } else if !valid.is_empty() {
        println!(
            "dry run: re-run with --commit to import {} rows",
            valid.len()
        );
    }

    Ok(())
}

fn print_preview(preview: &ImportPreview, categories: &[Category]) {
    println!(
        "columns: {}",
        describe_mapping(&preview.mapping, &preview.header)
    );

    for (row, result) in preview.rows.iter().zip(&preview.results) {
        match result {
            Ok(n) => {
                let category = n
                    .category_id
                    .as_ref()
                    .and_then(|id| categories.iter().find(|c| &c.id == id))
                    .map(|c| c.name.as_str())
                    .unwrap_or("-");
                let amount = n.amount.to_string();
                println!(
                    "  line {:>4}  {}  {:>12}  {}  [{}]",
                    row.line, n.date, amount, n.description, category
                );
            }
            Err(e) => println!("  line {:>4}  skipped: {e}", row.line),
        }
    }

    let total = preview
        .results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .fold(Money::zero(), |acc, n| acc + n.amount);
    let valid = preview.results.len() - preview.error_count();
    println!(
        "{} rows: {} valid totalling {}, {} with errors",
        preview.results.len(),
        valid,
        total,
        preview.error_count()
    );
}

fn describe_mapping(mapping: &ColumnMapping, header: &[String]) -> String {
    let describe = |column: Option<usize>| match column {
        Some(i) => header
            .get(i)
            .map(|h| format!("{i} ({h})"))
            .unwrap_or_else(|| i.to_string()),
        None => "unmapped".to_string(),
    };
    format!(
        "date={} amount={} description={} category={}",
        describe(mapping.date_column),
        describe(mapping.amount_column),
        describe(mapping.description_column),
        describe(mapping.category_column),
    )
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCmd {
    /// List known categories.
    List,
    /// Add a category.
    Add { name: String },
}

pub async fn run_categories(pool: &DbPool, cmd: CategoriesCmd) -> anyhow::Result<()> {
    match cmd {
        CategoriesCmd::List => {
            for c in impensa_storage::get_all_categories(pool).await? {
                println!("{}  {}", c.id, c.name);
            }
        }
        CategoriesCmd::Add { name } => {
            let category = Category::new(&name);
            impensa_storage::insert_category(pool, &category)
                .await
                .with_context(|| format!("adding category '{name}'"))?;
            println!("added '{}' ({})", category.name, category.id);
        }
    }
    Ok(())
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCmd {
    /// List saved import profiles.
    List,
    /// Delete a saved import profile.
    Delete { name: String },
}

pub async fn run_profiles(pool: &DbPool, cmd: ProfilesCmd) -> anyhow::Result<()> {
    match cmd {
        ProfilesCmd::List => {
            for p in impensa_storage::get_import_profiles(pool).await? {
                println!(
                    "{}  [{}]  date={:?} amount={:?} description={:?} category={:?}",
                    p.name,
                    p.date_order.as_str(),
                    p.mapping.date_column,
                    p.mapping.amount_column,
                    p.mapping.description_column,
                    p.mapping.category_column,
                );
            }
        }
        ProfilesCmd::Delete { name } => {
            if impensa_storage::delete_import_profile(pool, &name).await? {
                println!("deleted profile '{name}'");
            } else {
                println!("no profile named '{name}'");
            }
        }
    }
    Ok(())
}
