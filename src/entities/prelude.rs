pub use super::current_quotes::Entity as CurrentQuotes;
pub use super::quote_versions::Entity as QuoteVersions;
pub use super::sources::Entity as Sources;
