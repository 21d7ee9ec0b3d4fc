pub mod check;
pub mod info;
pub mod init;
pub mod render;
pub mod run;
pub mod text;
