//! Data layer: core types, decoding, cleaning and encoding.
//!
//! Architecture:
//! ```text
//!   .csv / .xlsx
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  decode bytes → Table (types tagged once)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ pipeline  │  dedupe → fill missing → select columns
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  chart    │   │  export   │  Table → CSV / XLSX bytes
//!   └──────────┘   └──────────┘
//! ```

pub mod chart;
pub mod clean;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod select;
