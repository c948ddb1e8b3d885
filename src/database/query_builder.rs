use std::marker::PhantomData;

use crate::database::models::Entity;
use crate::database::store::Relation;

/// Parameterized statements for one entity table.
///
/// Table and column names come from `Entity` constants, never from requests,
/// but are still quoted so reserved words are safe as column names.
pub struct QueryBuilder<T> {
    _phantom: PhantomData<T>,
}

impl<T: Entity> QueryBuilder<T> {
    pub fn select_all() -> String {
        format!("{} ORDER BY \"id\"", Self::select_prefix())
    }

    pub fn select_by_id() -> String {
        format!("{} WHERE \"id\" = $1", Self::select_prefix())
    }

    pub fn select_by(relation: Relation) -> String {
        format!(
            "{} WHERE {} = $1 ORDER BY \"id\"",
            Self::select_prefix(),
            quote_identifier(relation.column())
        )
    }

    pub fn insert() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
            quote_identifier(T::TABLE),
            Self::column_list(),
            placeholders.join(", ")
        )
    }

    /// `id` is bound last, after every writable column.
    pub fn update() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", quote_identifier(column), i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE \"id\" = ${}",
            quote_identifier(T::TABLE),
            assignments.join(", "),
            T::COLUMNS.len() + 1
        )
    }

    pub fn delete_by_id() -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1", quote_identifier(T::TABLE))
    }

    fn select_prefix() -> String {
        format!(
            "SELECT \"id\", {} FROM {}",
            Self::column_list(),
            quote_identifier(T::TABLE)
        )
    }

    fn column_list() -> String {
        T::COLUMNS
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Quote SQL identifier to prevent injection
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Course, Grade};

    #[test]
    fn builds_insert_with_returning_id() {
        assert_eq!(
            QueryBuilder::<Course>::insert(),
            "INSERT INTO \"courses\" (\"name\", \"description\") VALUES ($1, $2) RETURNING \"id\""
        );
    }

    #[test]
    fn update_binds_id_after_columns() {
        assert_eq!(
            QueryBuilder::<Course>::update(),
            "UPDATE \"courses\" SET \"name\" = $1, \"description\" = $2 WHERE \"id\" = $3"
        );
    }

    #[test]
    fn filters_by_relation_column() {
        assert_eq!(
            QueryBuilder::<Grade>::select_by(Relation::Professor),
            "SELECT \"id\", \"student_id\", \"course_id\", \"professor_id\", \"grade\" \
             FROM \"grades\" WHERE \"professor_id\" = $1 ORDER BY \"id\""
        );
    }

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
