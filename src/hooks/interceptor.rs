use super::entry::{CameraCall, EntryPoint};

/// Handle of an installed hook; negative values mark a failed install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub i32);

impl HookHandle {
    pub fn is_installed(&self) -> bool {
        self.0 >= 0
    }
}

/// Mechanism that redirects camera library exports to the synthetic camera
pub trait Interceptor {
    /// Redirect `entry` of library `library_nid`
    fn install(&mut self, library_nid: u32, entry: EntryPoint) -> HookHandle;

    /// Run the original implementation behind `handle`
    fn call_through(&mut self, handle: HookHandle, call: &mut CameraCall<'_>) -> i32;

    fn uninstall(&mut self, handle: HookHandle);
}
