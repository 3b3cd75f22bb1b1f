pub mod collection;
pub mod features;
pub mod providers;
pub mod recommendations;
pub mod recommender;
pub mod similarity;
pub mod stopwords;
pub mod title_search;

pub use collection::CatalogCollection;
pub use features::{FeatureBuilder, FeatureMatrix};
pub use recommender::recommend;
pub use similarity::{compute_similarity, SimilarityMatrix};
