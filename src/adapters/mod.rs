pub mod gpg;
pub mod smtp;
