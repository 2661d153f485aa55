//! Pet insurance providers and the quotes they have given.

mod provider;
mod quote;

pub use provider::{
    InsuranceProvider, PROVIDER_COLUMNS, ProviderId, create_provider, create_provider_table,
    map_provider_row,
};
pub use quote::{
    InsuranceQuote, QUOTE_COLUMNS, QuoteId, create_quote, create_quote_table, map_quote_row,
};
