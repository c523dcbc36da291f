pub mod lettre_transport;
