// Tagging grammars: input spans to tag strings.
//
// Builders are independent and return plain transducers; `classify` unions
// them into the grammar used by the normalizer.

pub mod address;
pub mod cardinal;
pub mod classify;
pub mod decimal;
pub mod fraction;
pub mod measure;
pub mod ordinal;

pub use address::{AddressMatch, ContextualAddress, StructuredAddress};
pub use cardinal::CardinalTagger;
pub use decimal::DecimalTagger;
pub use fraction::FractionTagger;
pub use measure::MeasureTagger;
pub use ordinal::OrdinalTagger;
