pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod oauth;
pub mod state;
pub mod web;
