/// All persisted primary keys are PostgreSQL BIGSERIAL on the league API side.
pub type DbId = i64;
