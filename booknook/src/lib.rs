//! Book Nook library
//!
//! A personal book tracker: a bookshelf with reading statuses, a reading
//! journal decorated with stickers, AI recommendations and Open Library
//! metadata. This library exposes the core functionality for the
//! command-line front end and for testing.

pub mod app;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod metadata;
pub mod services;
pub mod stickers;
pub mod store;
pub mod views;
