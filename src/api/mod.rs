//! # API Module
//!
//! Business logic of the bridge, independent of the http layer.
//!
//! ## Modules
//!
//! - [`contact_lock`] - Per contact serialization of the find-or-create sequence
//! - [`relay`] - WhatsApp -> Chatwoot relay
//! - [`resolver`] - WhatsApp contact -> Chatwoot contact/conversation resolution
//! - [`tenant`] - Tenant identification and chatwoot configuration

pub mod contact_lock;
pub mod relay;
pub mod resolver;
pub mod tenant;
