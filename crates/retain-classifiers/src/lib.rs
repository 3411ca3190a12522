//! retain-classifiers: churn risk scoring and model comparison.
//!
//! Two independent pieces live here. [`risk`] turns a customer profile into a
//! churn probability with a transparent point system, no model required.
//! [`evaluation`] scores already-trained classifiers against a held-out test
//! set, ranks them by ROC-AUC and derives their ROC curves.
//!
//! [`summary`] describes the customer base itself: churn rate per contract
//! type and payment method and the tenure distribution of churners.
//!
//! Loading models and test data ([`models::factory`], [`io`]) and the HTML
//! performance review ([`report`]) sit around that core.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod metrics;
pub mod models;
pub mod report;
pub mod risk;
pub mod summary;

pub use error::{ClassifierFailure, RetainError};
