//! Single-instance guard
//!
//! On Windows a named mutex marks the running instance. Dropping the guard
//! releases it, which is what relaunch relies on.

pub enum InstanceCheck {
    Primary(InstanceGuard),
    AlreadyRunning,
}

#[cfg(target_os = "windows")]
const MUTEX_NAME: &str = "Local\\google-chat-desktop-instance";

pub struct InstanceGuard {
    #[cfg(target_os = "windows")]
    handle: Option<windows::Win32::Foundation::HANDLE>,
}

#[cfg(target_os = "windows")]
pub fn acquire() -> InstanceCheck {
    acquire_named(MUTEX_NAME)
}

#[cfg(target_os = "windows")]
fn acquire_named(name: &str) -> InstanceCheck {
    use windows::core::HSTRING;
    use windows::Win32::Foundation::{GetLastError, BOOL, ERROR_ALREADY_EXISTS};
    use windows::Win32::System::Threading::CreateMutexW;

    let handle = match unsafe { CreateMutexW(None, BOOL::from(true), &HSTRING::from(name)) } {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("Single-instance mutex unavailable: {}", e);
            return InstanceCheck::Primary(InstanceGuard { handle: None });
        }
    };

    if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
        unsafe {
            let _ = windows::Win32::Foundation::CloseHandle(handle);
        }
        return InstanceCheck::AlreadyRunning;
    }

    InstanceCheck::Primary(InstanceGuard {
        handle: Some(handle),
    })
}

#[cfg(not(target_os = "windows"))]
pub fn acquire() -> InstanceCheck {
    InstanceCheck::Primary(InstanceGuard {})
}

#[cfg(target_os = "windows")]
impl Drop for InstanceGuard {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::ReleaseMutex;

        if let Some(handle) = self.handle.take() {
            unsafe {
                let _ = ReleaseMutex(handle);
                let _ = CloseHandle(handle);
            }
            tracing::debug!("Released single-instance mutex");
        }
    }
}

#[cfg(all(test, target_os = "windows"))]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_sees_running_instance() {
        let name = format!("Local\\gchat-instance-test-{}", std::process::id());

        let first = acquire_named(&name);
        assert!(matches!(first, InstanceCheck::Primary(InstanceGuard { handle: Some(_) })));
        assert!(matches!(acquire_named(&name), InstanceCheck::AlreadyRunning));

        // Relaunch drops the guard before the new process starts
        drop(first);
        assert!(matches!(acquire_named(&name), InstanceCheck::Primary(_)));
    }
}
