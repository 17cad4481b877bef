pub mod client;
pub mod prompt;
pub mod schema;
pub mod validator;
