//! FinCoach - AI quota service
//!
//! Enforces per-plan AI request quotas over weekly and monthly windows, and
//! the learning period that keeps AI features locked for new basic-plan
//! users. The quota engine is pure; persistence, accounts and the AI
//! provider sit behind ports.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
