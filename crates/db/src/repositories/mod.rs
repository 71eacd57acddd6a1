pub mod solution_publishing_repo;
pub mod solution_repo;
pub mod solution_review_repo;
pub mod solution_version_repo;

pub use solution_publishing_repo::SolutionPublishingRepo;
pub use solution_repo::{SolutionOrder, SolutionRepo, StatusStamp};
pub use solution_review_repo::SolutionReviewRepo;
pub use solution_version_repo::SolutionVersionRepo;
