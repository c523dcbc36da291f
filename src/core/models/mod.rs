pub mod import_result;
pub mod key_descriptor;
pub mod keyring_path;
pub mod outgoing_mail;
pub mod smtp_credentials;
