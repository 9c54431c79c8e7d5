pub(crate) mod assignments;
pub(crate) mod comments;
pub(crate) mod departments;
pub(crate) mod health;
pub(crate) mod indicators;
pub(crate) mod periods;
pub(crate) mod reports;
pub(crate) mod results;
pub(crate) mod signatures;
pub(crate) mod topics;
pub(crate) mod users;
