//! UI Components

pub mod toast;
