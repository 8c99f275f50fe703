pub mod quote;
pub mod slice;

pub use quote::{OptionType, QuoteRow};
pub use slice::{ChainSlice, FilteredQuote};
