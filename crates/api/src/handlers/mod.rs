pub mod admin;
pub mod categories;
pub mod launches;
pub mod projects;
pub mod upvotes;
