pub mod naming;
pub mod response;
pub mod upload;
