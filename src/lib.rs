pub mod shaders;
pub mod util;

pub use shaders::build_tasks;
