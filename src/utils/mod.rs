pub mod datetime;
pub mod html;
pub mod url;
