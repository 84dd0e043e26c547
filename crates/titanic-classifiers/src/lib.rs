//! titanic-classifiers: survival analysis over Titanic passenger records.
//!
//! The crate loads a passenger CSV into a typed table, engineers a small
//! feature set (encoded sex, imputed age, first/second class flags), splits
//! and standardises it, fits an L2-regularised logistic regression and reports
//! scores, coefficients and predictions for hand-built passengers, together
//! with Plotly figures and an HTML report.
//!
//! `pipeline::run_pipeline` chains all of it; the individual stages are public
//! for use on their own.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_engineering;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod stats;
