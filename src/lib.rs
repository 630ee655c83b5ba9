pub mod actions;
pub mod config;
pub mod errors;
pub mod explain;
pub mod io;
pub mod layout;
pub mod measure;
pub mod model;
pub mod parser;
pub mod text;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use layout::generate_mind_map;
pub use measure::{CellMetricsSurface, MeasureSurface};
pub use model::{Connection, MindMapData, Node, NodeId};
