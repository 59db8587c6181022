#[cfg(test)]
mod tests {
    use rowkit_core::{StatementKind, leading_word};

    #[test]
    fn detect() {
        assert_eq!(StatementKind::detect("INSERT INTO a VALUES (1)"), StatementKind::Insert);
        assert_eq!(StatementKind::detect("  replace into a values (1)"), StatementKind::Insert);
        assert_eq!(StatementKind::detect("\n\tUpdate a SET b = 1"), StatementKind::Update);
        assert_eq!(StatementKind::detect("delete from a where b = 1"), StatementKind::Delete);
        assert_eq!(StatementKind::detect("SELECT * FROM a"), StatementKind::Other);
        assert_eq!(StatementKind::detect("PRAGMA table_info(a)"), StatementKind::Other);
        assert_eq!(StatementKind::detect(""), StatementKind::Other);
    }

    #[test]
    fn keyword_must_be_a_word() {
        assert_eq!(StatementKind::detect("deleted_users"), StatementKind::Other);
        assert_eq!(StatementKind::detect("update"), StatementKind::Other);
        assert_eq!(StatementKind::detect("inserts"), StatementKind::Other);
        assert!(!StatementKind::is_statement("users"));
        assert!(StatementKind::is_statement(" DELETE FROM users WHERE id = 1"));
        assert!(!StatementKind::is_statement("SELECT 1"));
    }

    #[test]
    fn modify() {
        assert!(StatementKind::Insert.is_modify());
        assert!(StatementKind::Update.is_modify());
        assert!(StatementKind::Delete.is_modify());
        assert!(!StatementKind::Other.is_modify());
    }

    #[test]
    fn leading() {
        assert_eq!(leading_word("  select 1"), ("select", true));
        assert_eq!(leading_word("select"), ("select", false));
        assert_eq!(leading_word("   "), ("", false));
    }
}
