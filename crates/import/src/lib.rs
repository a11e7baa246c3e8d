pub mod executor;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod tokenizer;

pub use executor::{commit_rows, ExpenseStore, ImportOutcome, StoreError};
pub use mapping::{ColumnMapping, Field, MappingError};
pub use normalize::{parse_amount, parse_date, DateOrder, NormalizedRow, RowError};
pub use pipeline::{preview, preview_with_mapping, ImportPreview};
pub use resolve::resolve_category;
pub use tokenizer::{tokenize, RawRow, TokenizedFile};
