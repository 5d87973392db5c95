//! Java generators for tablegen: Play controllers over Ebean models.
//!
//! # Generated Output
//!
//! Paths are relative to the Play `app/` directory.
//!
//! - `java-model` - `models/BaseModel.java` and one entity per table; with
//!   row-level security also `models/SessionInfo.java` and
//!   `models/RlsAware.java`
//! - `java-repo` - `repository/<Table>Repository.java` plus the shared
//!   `BaseRepository`, `DatabaseExecutionContext` and
//!   `OptimisticLockingFailureException`
//! - `java-service` - `services/<Table>Service.java` with validation, paging
//!   and CSV import/export
//! - `java-controller` - `controllers/api/<Table>Controller.java`
//!
//! A composed query yields a DTO (record results only), a repository, a
//! service and a controller named after its base name.

mod generator;
mod java_file;
mod type_mapper;

pub mod files;

pub use generator::{
    JavaControllerGenerator, JavaModelGenerator, JavaRepoGenerator, JavaServiceGenerator,
    query_artifacts,
};
pub use java_file::JavaFile;
pub use type_mapper::JavaTypeMapper;
