pub(crate) mod model;
pub mod propagation;
pub(crate) mod space;
pub(crate) mod test_model;
pub mod variables;

pub use model::ConstraintPoster;
pub use model::Model;
pub use space::PropagationCounts;
pub use space::PropagatorStatus;
pub use space::Space;
pub use space::SpaceOptions;
pub use space::SpaceStatus;
