//! Linear projections fitted after scaling

pub mod linalg;
mod lda;
mod pca;

pub use lda::LinearDiscriminant;
pub use pca::Pca;
