pub mod delete;
pub mod deploy;
pub mod init;
pub mod skill;
pub mod status;
pub mod update;
