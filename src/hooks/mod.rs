mod entry;
mod interceptor;
mod set;

pub use entry::{CameraCall, EntryPoint, LIBRARY_NID};
pub use interceptor::{HookHandle, Interceptor};
pub use set::HookSet;
