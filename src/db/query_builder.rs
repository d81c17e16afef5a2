use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait, Condition, ConnectionTrait, DbBackend, IntoSimpleExpr,
};

/// Helper for building search conditions over text columns
///
/// Case folding depends on the backend: SQLite only folds ASCII in `LOWER()`
/// and `LIKE`, so there the pattern is expanded into a `GLOB` with a case
/// class per letter. Other backends compare `LOWER(column)` with `LIKE`.
pub struct SearchBuilder {
    backend: DbBackend,
    conditions: Vec<Condition>,
}

impl SearchBuilder {
    pub fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            conditions: Vec::new(),
        }
    }

    pub fn for_connection<C: ConnectionTrait>(db: &C) -> Self {
        Self::new(db.get_database_backend())
    }

    /// Case-insensitive substring match; blank patterns are ignored
    pub fn add_like<C: ColumnTrait>(mut self, column: C, pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return self;
        }

        let expr = match self.backend {
            DbBackend::Sqlite => Expr::cust_with_exprs(
                "$1 GLOB $2",
                [
                    column.into_simple_expr(),
                    SimpleExpr::Value(glob_pattern(pattern).into()),
                ],
            ),
            _ => {
                Expr::expr(Func::lower(column.into_simple_expr())).like(
                    LikeExpr::new(format!("%{}%", escape_like(&pattern.to_lowercase())))
                        .escape('\\'),
                )
            }
        };
        self.conditions.push(Condition::all().add(expr));
        self
    }

    /// Same pattern matched against every column
    pub fn add_like_any<C: ColumnTrait>(
        self,
        columns: impl IntoIterator<Item = C>,
        pattern: &str,
    ) -> Self {
        columns
            .into_iter()
            .fold(self, |builder, column| builder.add_like(column, pattern))
    }

    /// Add an exact match condition
    pub fn add_eq<C: ColumnTrait, V>(mut self, column: C, value: V) -> Self
    where
        V: Into<sea_orm::Value>,
    {
        self.conditions.push(Condition::all().add(column.eq(value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions joined with OR
    pub fn build(self) -> Option<Condition> {
        self.fold(Condition::any())
    }

    /// Conditions joined with AND
    pub fn build_all(self) -> Option<Condition> {
        self.fold(Condition::all())
    }

    fn fold(self, root: Condition) -> Option<Condition> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(
                self.conditions
                    .into_iter()
                    .fold(root, |acc, cond| acc.add(cond)),
            )
        }
    }
}

/// `LIKE` metacharacters taken literally under `ESCAPE '\'`
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `*pattern*` where every cased letter becomes a class of its case variants
/// and the `GLOB` metacharacters match themselves
fn glob_pattern(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len() * 4 + 2);
    glob.push('*');
    for c in pattern.chars() {
        match c {
            '*' | '?' | '[' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            _ => {
                let mut variants = vec![c];
                for variant in [single_char(c.to_lowercase()), single_char(c.to_uppercase())]
                    .into_iter()
                    .flatten()
                {
                    if !variants.contains(&variant) {
                        variants.push(variant);
                    }
                }
                if variants.len() == 1 {
                    glob.push(c);
                } else {
                    glob.push('[');
                    glob.extend(variants);
                    glob.push(']');
                }
            }
        }
    }
    glob.push('*');
    glob
}

/// Case mappings that expand to several characters ("ß" -> "SS") are skipped
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{client, part};
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

    fn sql(backend: DbBackend, condition: Condition) -> String {
        client::Entity::find()
            .filter(condition)
            .build(backend)
            .to_string()
    }

    #[test]
    fn blank_patterns_produce_no_condition() {
        let builder = SearchBuilder::new(DbBackend::Sqlite)
            .add_like(client::Column::LastName, "   ")
            .add_like(client::Column::City, "");
        assert!(builder.is_empty());
        assert!(builder.build().is_none());
    }

    #[test]
    fn sqlite_matches_both_cases_of_every_letter() {
        let condition = SearchBuilder::new(DbBackend::Sqlite)
            .add_like_any([client::Column::LastName, client::Column::City], "DuPont")
            .build()
            .unwrap();
        let sql = sql(DbBackend::Sqlite, condition);

        assert!(sql.contains("GLOB '*[Dd][uU][Pp][oO][nN][tT]*'"), "{sql}");
        assert!(sql.contains(" OR "));
        assert!(!sql.contains("LIKE"));
    }

    #[test]
    fn sqlite_folds_accented_letters() {
        assert_eq!(glob_pattern("émile"), "*[éÉ][mM][iI][lL][eE]*");
        assert_eq!(glob_pattern("ÉMILE"), "*[Éé][Mm][Ii][Ll][Ee]*");
    }

    #[test]
    fn glob_metacharacters_are_literal() {
        assert_eq!(glob_pattern("a*b?[1]"), "*[aA][*][bB][?][[]1]*");
        // no special meaning under GLOB
        assert_eq!(glob_pattern("50%_"), "*50%_*");
        // uppercase is two characters, lowercase is itself
        assert_eq!(glob_pattern("ß"), "*ß*");
    }

    #[test]
    fn postgres_escapes_like_wildcards() {
        let condition = SearchBuilder::new(DbBackend::Postgres)
            .add_like(part::Column::Designation, "Remise 50%_")
            .build()
            .unwrap();
        let sql = part::Entity::find()
            .filter(condition)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("LOWER("), "{sql}");
        // the literal may be printed with its backslashes doubled
        assert!(
            sql.contains(r"remise 50\%\_%") || sql.contains(r"remise 50\\%\\_%"),
            "{sql}"
        );
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn escape_like_doubles_the_escape_character() {
        assert_eq!(escape_like(r"a\b%c_d"), r"a\\b\%c\_d");
    }

    #[test]
    fn build_all_joins_with_and() {
        let condition = SearchBuilder::new(DbBackend::Sqlite)
            .add_like(client::Column::LastName, "martin")
            .add_eq(client::Column::PostalCode, "75011")
            .build_all()
            .unwrap();
        let sql = sql(DbBackend::Sqlite, condition);

        assert!(sql.contains(" AND "));
        assert!(sql.contains("'75011'"));
    }
}
