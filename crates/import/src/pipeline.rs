use impensa_core::Category;

use crate::mapping::{ColumnMapping, MappingError};
use crate::normalize::{normalize_row, DateOrder, NormalizedRow, RowError};
use crate::tokenizer::{tokenize, RawRow, TokenizedFile};

/// Everything the pipeline exposes for caller review before commit:
/// the header, the raw rows, the mapping in effect, and one
/// normalized-or-error result per row. Producing it is side-effect-free.
#[derive(Debug, Clone)]
pub struct ImportPreview {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
    pub mapping: ColumnMapping,
    pub results: Vec<Result<NormalizedRow, RowError>>,
}

impl ImportPreview {
    /// The rows eligible for commit, in source order.
    pub fn valid_rows(&self) -> Vec<NormalizedRow> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().ok().cloned())
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }
}

/// Tokenizes, infers the column mapping from the header, and normalizes
/// every row against the caller's category list.
pub fn preview(text: &str, categories: &[Category], order: DateOrder) -> ImportPreview {
    let file = tokenize(text);
    let mapping = ColumnMapping::infer(&file.header);
    assemble(file, mapping, categories, order)
}

/// Same as [`preview`], but with a caller-supplied mapping override. The
/// override is validated against the header width before any row is
/// normalized.
pub fn preview_with_mapping(
    text: &str,
    mapping: ColumnMapping,
    categories: &[Category],
    order: DateOrder,
) -> Result<ImportPreview, MappingError> {
    let file = tokenize(text);
    mapping.validate(file.header.len())?;
    Ok(assemble(file, mapping, categories, order))
}

fn assemble(
    file: TokenizedFile,
    mapping: ColumnMapping,
    categories: &[Category],
    order: DateOrder,
) -> ImportPreview {
    let results = file
        .rows
        .iter()
        .map(|row| normalize_row(row, &mapping, categories, order))
        .collect();
    ImportPreview {
        header: file.header,
        rows: file.rows,
        mapping,
        results,
    }
}
