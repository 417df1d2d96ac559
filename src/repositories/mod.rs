pub(crate) mod announcements;
pub(crate) mod assignments;
pub(crate) mod classes;
pub(crate) mod enrollments;
pub(crate) mod health;
pub(crate) mod materials;
pub(crate) mod submissions;
pub(crate) mod users;
