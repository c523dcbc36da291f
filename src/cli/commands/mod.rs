pub mod check;
pub mod encrypt;
pub mod keys;
pub mod send;
