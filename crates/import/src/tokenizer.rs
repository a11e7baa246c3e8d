/// One data line of the source file, positionally aligned with the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based physical line number, for error reporting.
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenizedFile {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Splits raw CSV text into a trimmed header and data rows.
///
/// Line endings are normalized first, then lines that are empty after
/// trimming are discarded before any row parsing, so trailing blank lines
/// never become spurious rows. Input with zero non-empty lines yields an
/// empty header and no rows.
///
/// Tokenization is strictly line-by-line: a quoted field spanning physical
/// lines is an unsupported input shape and splits into short rows, which
/// surface later as per-row normalization errors.
pub fn tokenize(text: &str) -> TokenizedFile {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut header = Vec::new();
    let mut rows = Vec::new();
    let mut seen_header = false;

    for (idx, line) in normalized.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(line);
        if seen_header {
            rows.push(RawRow {
                line: idx + 1,
                fields,
            });
        } else {
            header = fields;
            seen_header = true;
        }
    }

    TokenizedFile { header, rows }
}

/// Quote-aware split of one physical line.
///
/// A double-quoted field may contain literal commas; `""` inside quotes
/// unescapes to a single quote. Every field is trimmed after extraction.
/// Malformed quoting never errors — an unterminated quote simply runs the
/// field to the end of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(file: &TokenizedFile, row: usize) -> &[String] {
        &file.rows[row].fields
    }

    #[test]
    fn row_count_matches_non_empty_data_lines() {
        let file = tokenize("date,amount\n2024-01-15,5.00\n2024-01-16,6.00\n2024-01-17,7.00\n");
        assert_eq!(file.header, vec!["date", "amount"]);
        assert_eq!(file.rows.len(), 3);
        for row in &file.rows {
            assert_eq!(row.fields.len(), file.header.len());
        }
    }

    #[test]
    fn blank_and_trailing_lines_are_discarded() {
        let file = tokenize("date,amount\n\n  \n2024-01-15,5.00\n\n\n");
        assert_eq!(file.rows.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_file() {
        let file = tokenize("");
        assert!(file.header.is_empty());
        assert!(file.rows.is_empty());

        let file = tokenize("\n \n\t\n");
        assert!(file.header.is_empty());
        assert!(file.rows.is_empty());
    }

    #[test]
    fn header_only_yields_no_rows() {
        let file = tokenize("date,amount,description\n");
        assert_eq!(file.header.len(), 3);
        assert!(file.rows.is_empty());
    }

    #[test]
    fn crlf_and_bare_cr_line_endings() {
        let file = tokenize("date,amount\r\n2024-01-15,5.00\r2024-01-16,6.00\r\n");
        assert_eq!(file.rows.len(), 2);
        assert_eq!(fields(&file, 0)[0], "2024-01-15");
        assert_eq!(fields(&file, 1)[0], "2024-01-16");
    }

    #[test]
    fn quoted_field_keeps_commas() {
        let file = tokenize("date,description\n2024-01-15,\"AMAZON, INC\"\n");
        assert_eq!(fields(&file, 0)[1], "AMAZON, INC");
    }

    #[test]
    fn doubled_quote_unescapes() {
        let file = tokenize("date,description\n2024-01-15,\"SAY \"\"HI\"\"\"\n");
        assert_eq!(fields(&file, 0)[1], "SAY \"HI\"");
    }

    #[test]
    fn fields_are_trimmed() {
        let file = tokenize("  date , amount \n 2024-01-15 ,  5.00 \n");
        assert_eq!(file.header, vec!["date", "amount"]);
        assert_eq!(fields(&file, 0), ["2024-01-15", "5.00"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let file = tokenize("a,b\n\"no closing quote, same field\n");
        assert_eq!(fields(&file, 0), ["no closing quote, same field"]);
    }

    #[test]
    fn ragged_row_is_kept_as_is() {
        let file = tokenize("a,b,c\n1,2\n");
        assert_eq!(fields(&file, 0).len(), 2);
    }

    #[test]
    fn line_numbers_refer_to_the_source_file() {
        let file = tokenize("a,b\n\n1,2\n");
        assert_eq!(file.rows[0].line, 3);
    }

    #[test]
    fn standard_quoting_round_trips() {
        let original = "a \"quoted\" value, with comma";
        let serialized = format!("\"{}\"", original.replace('"', "\"\""));
        let file = tokenize(&format!("description\n{serialized}\n"));
        assert_eq!(fields(&file, 0)[0], original);
    }
}
