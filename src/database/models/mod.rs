pub mod course;
pub mod enrollment;
pub mod grade;
pub mod professor;
pub mod student;

pub use course::{Course, CourseInput};
pub use enrollment::{Enrollment, EnrollmentInput};
pub use grade::{Grade, GradeInput};
pub use professor::{Professor, ProfessorInput};
pub use student::{Student, StudentInput};

use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{query::Query, FromRow, Postgres};

use crate::database::store::Relation;
use crate::services::validation::ValidationError;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A table-backed record with a store-assigned integer id.
///
/// Everything the generic store, service and router need to know about a
/// resource lives here, so the five resources share one implementation of
/// each layer.
pub trait Entity:
    Serialize + Clone + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    /// Inbound write payload. Every field is optional so presence can be checked.
    type Input: DeserializeOwned + Send + 'static;

    /// Singular name for messages, e.g. "student".
    const NAME: &'static str;

    const TABLE: &'static str;

    /// Writable columns, in the order `bind_columns` binds them. Never includes `id`.
    const COLUMNS: &'static [&'static str];

    /// Collections this entity can be filtered by.
    const RELATIONS: &'static [Relation] = &[];

    fn id(&self) -> i64;

    fn with_id(self, id: i64) -> Self;

    /// Validates an inbound payload and builds an entity with id 0.
    fn from_input(input: Self::Input) -> Result<Self, ValidationError>;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;

    fn relation_id(&self, _relation: Relation) -> Option<i64> {
        None
    }
}
