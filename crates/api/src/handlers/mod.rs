pub mod health;
pub mod lifecycle;
pub mod publishing;
pub mod reviews;
pub mod solutions;
pub mod versions;
