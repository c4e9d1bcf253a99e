pub mod auth;
pub mod comments;
pub mod invitation;
pub mod likes;
pub mod media;
pub mod messages;
pub mod middleware;
pub mod uploads;
pub mod venue;
