use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, PgQuery};
use crate::services::validation::{ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Entity for Course {
    type Input = CourseInput;

    const NAME: &'static str = "course";
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    fn from_input(input: CourseInput) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        let course = Course {
            id: 0,
            name: v.text("name", input.name),
            description: v.text("description", input.description),
        };
        v.finish()?;
        Ok(course)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.name.as_str()).bind(self.description.as_str())
    }
}
