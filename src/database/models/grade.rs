use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Entity, PgQuery};
use crate::database::store::Relation;
use crate::services::validation::{ValidationError, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub professor_id: i64,
    pub grade: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct GradeInput {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub professor_id: Option<i64>,
    pub grade: Option<f64>,
}

impl Entity for Grade {
    type Input = GradeInput;

    const NAME: &'static str = "grade";
    const TABLE: &'static str = "grades";
    const COLUMNS: &'static [&'static str] = &["student_id", "course_id", "professor_id", "grade"];
    const RELATIONS: &'static [Relation] =
        &[Relation::Student, Relation::Course, Relation::Professor];

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    fn from_input(input: GradeInput) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        let grade = Grade {
            id: 0,
            student_id: v.required("student_id", input.student_id),
            course_id: v.required("course_id", input.course_id),
            professor_id: v.required("professor_id", input.professor_id),
            grade: v.required("grade", input.grade),
        };
        v.finish()?;
        Ok(grade)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.student_id)
            .bind(self.course_id)
            .bind(self.professor_id)
            .bind(self.grade)
    }

    fn relation_id(&self, relation: Relation) -> Option<i64> {
        match relation {
            Relation::Student => Some(self.student_id),
            Relation::Course => Some(self.course_id),
            Relation::Professor => Some(self.professor_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_is_a_real_grade() {
        let grade = Grade::from_input(GradeInput {
            student_id: Some(1),
            course_id: Some(2),
            professor_id: Some(3),
            grade: Some(0.0),
        })
        .unwrap();
        assert_eq!(grade.grade, 0.0);
    }

    #[test]
    fn absent_score_is_rejected() {
        let err = Grade::from_input(GradeInput {
            student_id: Some(1),
            course_id: Some(2),
            professor_id: Some(3),
            grade: None,
        })
        .unwrap_err();
        assert_eq!(err.fields, vec!["grade"]);
    }
}
