pub(crate) mod assignments;
pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod departments;
pub(crate) mod envelope;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod indicators;
pub(crate) mod periods;
pub(crate) mod reports;
pub(crate) mod results;
pub(crate) mod router;
pub(crate) mod signatures;
pub(crate) mod topics;
pub(crate) mod users;
pub(crate) mod validation;
