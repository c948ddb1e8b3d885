use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, PgQuery};
use crate::services::validation::{ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Professor {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfessorInput {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
}

impl Entity for Professor {
    type Input = ProfessorInput;

    const NAME: &'static str = "professor";
    const TABLE: &'static str = "professors";
    const COLUMNS: &'static [&'static str] = &["name", "last_name", "email", "specialization"];

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    fn from_input(input: ProfessorInput) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        let professor = Professor {
            id: 0,
            name: v.text("name", input.name),
            last_name: v.text("last_name", input.last_name),
            email: v.text("email", input.email),
            specialization: v.optional_text(input.specialization),
        };
        v.finish()?;
        Ok(professor)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.as_str())
            .bind(self.last_name.as_str())
            .bind(self.email.as_str())
            .bind(self.specialization.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialization_is_optional() {
        let professor = Professor::from_input(ProfessorInput {
            name: Some("Alan".into()),
            last_name: Some("Turing".into()),
            email: Some("alan@x.com".into()),
            specialization: None,
        })
        .unwrap();
        assert_eq!(professor.specialization, None);

        let json = serde_json::to_value(&professor).unwrap();
        assert!(json.get("specialization").is_none());
    }
}
