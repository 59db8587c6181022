use crate::leading_word;

/// Kind of a SQL statement, detected from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `INSERT` or `REPLACE`.
    Insert,
    Update,
    Delete,
    /// Anything else, expected to produce rows (possibly none).
    Other,
}

impl StatementKind {
    /// Leading keyword match, case-insensitive, leading whitespace allowed.
    ///
    /// The keyword must be followed by whitespace: a bare `delete` is a table name, not a statement.
    pub fn detect(sql: &str) -> Self {
        let (word, followed) = leading_word(sql);
        if !followed {
            return StatementKind::Other;
        }
        if word.eq_ignore_ascii_case("insert") || word.eq_ignore_ascii_case("replace") {
            StatementKind::Insert
        } else if word.eq_ignore_ascii_case("update") {
            StatementKind::Update
        } else if word.eq_ignore_ascii_case("delete") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    /// True for statements that modify rows.
    pub fn is_modify(self) -> bool {
        self != StatementKind::Other
    }

    /// True when `table` is actually a complete INSERT, UPDATE or DELETE statement.
    pub fn is_statement(table: &str) -> bool {
        Self::detect(table).is_modify()
    }
}
