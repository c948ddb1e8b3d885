use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, PgQuery};
use crate::database::store::Relation;
use crate::services::validation::{ValidationError, Validator};

/// A student's registration in a course. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentInput {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
}

impl Entity for Enrollment {
    type Input = EnrollmentInput;

    const NAME: &'static str = "enrollment";
    const TABLE: &'static str = "enrollments";
    const COLUMNS: &'static [&'static str] = &["student_id", "course_id"];
    const RELATIONS: &'static [Relation] = &[Relation::Student, Relation::Course];

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    fn from_input(input: EnrollmentInput) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        let enrollment = Enrollment {
            id: 0,
            student_id: v.required("student_id", input.student_id),
            course_id: v.required("course_id", input.course_id),
        };
        v.finish()?;
        Ok(enrollment)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.student_id).bind(self.course_id)
    }

    fn relation_id(&self, relation: Relation) -> Option<i64> {
        match relation {
            Relation::Student => Some(self.student_id),
            Relation::Course => Some(self.course_id),
            Relation::Professor => None,
        }
    }
}
