pub(crate) mod announcements;
pub(crate) mod assignments;
pub(crate) mod auth;
pub(crate) mod classes;
pub(crate) mod enrollments;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod materials;
pub(crate) mod router;
pub(crate) mod submissions;
pub(crate) mod users;
pub(crate) mod validation;
