//! # gestio-entity
//!
//! Domain entity models for Gestio. Every struct in this crate represents
//! a persisted row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`.

pub mod notification;
pub mod permission;
pub mod session;
pub mod subscription;
pub mod token;
pub mod user;
