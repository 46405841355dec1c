pub mod context;
pub mod ext;
pub mod request;
pub mod result;
