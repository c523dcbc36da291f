pub mod crypto_engine;
pub mod mail_transport;
