//! # Market Data
//!
//! $$
//! \text{raw history} \xrightarrow{\text{condition}} P \in \mathbb{R}^{T \times N}
//! $$
//!
//! Data model, calendar conditioning, FX resolution and the collaborator
//! traits the quantitative core is wired against.

pub mod calendar;
pub mod conditioner;
pub mod fx;
pub mod metadata;
pub mod provider;
pub mod series;

pub use calendar::business_days;
pub use calendar::is_business_day;
pub use conditioner::assemble_price_matrix;
pub use conditioner::condition_series;
pub use fx::convert_series;
pub use fx::resolve_fx;
pub use fx::ResolvedFx;
pub use metadata::CsvMetadataSource;
pub use provider::CachedProvider;
pub use provider::MarketDataProvider;
pub use provider::ReferenceMetadata;
pub use provider::SecurityInfo;
pub use provider::StaticProvider;
pub use series::FxSeries;
pub use series::PriceMatrix;
pub use series::PriceSeries;
