pub mod init;
pub mod run;
