//! Department CRUD. Deletion is a soft delete and is refused while active
//! employees still belong to the department.

pub mod handlers;
