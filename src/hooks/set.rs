use super::entry::{CameraCall, EntryPoint, LIBRARY_NID};
use super::interceptor::{HookHandle, Interceptor};
use crate::camera::SyntheticCamera;
use crate::error::InterceptError;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Hooks installed for every camera export
#[derive(Debug, Default)]
pub struct HookSet {
    handles: HashMap<EntryPoint, HookHandle>,
}

impl HookSet {
    /// Install all entry points independently; failures are logged and kept
    /// as negative handles
    pub fn install(interceptor: &mut dyn Interceptor) -> Self {
        let mut handles = HashMap::new();
        for entry in EntryPoint::all() {
            let handle = interceptor.install(LIBRARY_NID, entry);
            if handle.is_installed() {
                debug!("Hooked {} ({:#010x})", entry.name(), entry.export_nid());
            } else {
                warn!(
                    "{}",
                    InterceptError::Install {
                        export: entry.name(),
                        code: handle.0,
                    }
                );
            }
            handles.insert(entry, handle);
        }

        let set = Self { handles };
        info!(
            "Installed {} of {} camera hooks",
            set.installed_count(),
            set.handles.len()
        );
        set
    }

    pub fn installed_count(&self) -> usize {
        self.handles.values().filter(|h| h.is_installed()).count()
    }

    pub fn handle(&self, entry: EntryPoint) -> Option<HookHandle> {
        self.handles.get(&entry).copied()
    }

    /// Call through to the original and let the synthetic camera amend the
    /// result
    pub fn dispatch(
        &self,
        interceptor: &mut dyn Interceptor,
        camera: &mut SyntheticCamera,
        call: &mut CameraCall<'_>,
    ) -> Result<i32, InterceptError> {
        let entry = call.entry_point();
        let handle = self
            .handle(entry)
            .filter(HookHandle::is_installed)
            .ok_or(InterceptError::NotInstalled(entry.name()))?;

        let original = interceptor.call_through(handle, call);
        Ok(camera.handle(call, original))
    }

    /// Uninstall every hook that was installed
    pub fn release(&mut self, interceptor: &mut dyn Interceptor) {
        let mut released = 0;
        for (_, handle) in self.handles.drain() {
            if handle.is_installed() {
                interceptor.uninstall(handle);
                released += 1;
            }
        }
        info!("Released {} camera hooks", released);
    }
}
