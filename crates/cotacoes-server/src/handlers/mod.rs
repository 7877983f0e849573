//! HTTP handlers

pub mod auth;
pub mod cotacoes;
pub mod meta;
