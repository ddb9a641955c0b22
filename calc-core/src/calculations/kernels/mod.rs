//! Formula families shared by every calculator screen.

pub mod amortization;
pub mod compounding;
pub mod progressive_tax;
pub mod ratio;
