//! Analytical routines shared by the backend adapters.
pub mod cases;
pub mod heatmap;
pub mod opera;
pub mod petri;
pub mod variants;
