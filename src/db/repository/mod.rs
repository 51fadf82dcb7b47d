pub mod audit;
pub mod note;
pub mod patient;
pub mod vocabulary;

pub use audit::*;
pub use note::*;
pub use patient::*;
pub use vocabulary::*;

use uuid::Uuid;

use super::DatabaseError;

fn parse_uuid(column: &str, value: String) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(&value).map_err(|_| DatabaseError::InvalidUuid {
        column: column.into(),
        value,
    })
}
