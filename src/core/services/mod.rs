pub mod crypto_service;
pub mod keyring_scope;
pub mod mail_gateway;
pub mod secure_mail_service;
