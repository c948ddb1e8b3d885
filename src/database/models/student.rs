use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, PgQuery};
use crate::services::validation::{ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentInput {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

impl Entity for Student {
    type Input = StudentInput;

    const NAME: &'static str = "student";
    const TABLE: &'static str = "students";
    const COLUMNS: &'static [&'static str] =
        &["name", "last_name", "date_of_birth", "address", "email"];

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    fn from_input(input: StudentInput) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        let student = Student {
            id: 0,
            name: v.text("name", input.name),
            last_name: v.text("last_name", input.last_name),
            date_of_birth: v.text("date_of_birth", input.date_of_birth),
            address: v.text("address", input.address),
            email: v.text("email", input.email),
        };
        v.finish()?;
        Ok(student)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.as_str())
            .bind(self.last_name.as_str())
            .bind(self.date_of_birth.as_str())
            .bind(self.address.as_str())
            .bind(self.email.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_student_field_is_required() {
        let err = Student::from_input(StudentInput::default()).unwrap_err();
        assert_eq!(
            err.fields,
            vec!["name", "last_name", "date_of_birth", "address", "email"]
        );
    }

    #[test]
    fn builds_student_without_id() {
        let input: StudentInput = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Ana",
            "last_name": "Ruiz",
            "date_of_birth": "2000-01-01",
            "address": "Main St",
            "email": "ana@x.com"
        }))
        .unwrap();

        let student = Student::from_input(input).unwrap();
        assert_eq!(student.id, 0);
        assert_eq!(student.last_name, "Ruiz");
    }
}
