//! Core library for Vismem: a client for an AI screenshot-memory service.
//!
//! The heart of the crate is [`controller::GalleryController`], which owns
//! the canonical in-memory model of screenshots, search results and image
//! previews, and keeps it consistent across upload, search, delete and
//! migration operations performed against a remote backend it does not
//! control. Everything else supports it: the wire [`model`], the
//! [`backend`] client trait, the no-downgrade [`preview`] cache, the
//! deterministic [`placeholder`] synthesizer and the [`suggest`] table.

pub mod auth;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod placeholder;
pub mod preview;
pub mod search;
pub mod suggest;

pub use error::{Result, VismemError};
