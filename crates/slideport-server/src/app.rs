//! The single connection to the host application.
//!
//! [`ApplicationHandle`] owns the host backend. It is constructed once with an
//! injected [`PresentationHost`] and attaches lazily: every accessor that
//! needs a live host goes through [`ApplicationHandle::host`], which
//! (re)attaches when the process is not running.

use slideport_host::{AppStatus, HostError, PresentationHost};

pub struct ApplicationHandle {
    host: Box<dyn PresentationHost>,
    attached: bool,
}

impl ApplicationHandle {
    pub fn new(host: impl PresentationHost + 'static) -> Self {
        ApplicationHandle {
            host: Box::new(host),
            attached: false,
        }
    }

    /// Attaches to (or launches) the host and makes it visible. Idempotent.
    pub fn initialize(&mut self) -> Result<AppStatus, HostError> {
        let status = self.host.status();
        if self.attached && status.running {
            return Ok(status);
        }
        let status = self.host.attach()?;
        if !self.attached {
            tracing::info!(version = %status.version, visible = status.visible, "attached to host");
        } else {
            tracing::warn!("host process was gone, re-attached");
        }
        self.attached = true;
        Ok(status)
    }

    /// The live host, attaching first if needed.
    pub fn host(&mut self) -> Result<&mut dyn PresentationHost, HostError> {
        self.initialize()?;
        Ok(self.host.as_mut())
    }

    pub fn status(&self) -> AppStatus {
        self.host.status()
    }

    pub fn is_attached(&self) -> bool {
        self.attached && self.host.status().running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideport_host::{HostFault, MemoryHost};

    #[test]
    fn initialize_is_idempotent() {
        let host = MemoryHost::new();
        let mut app = ApplicationHandle::new(host.clone());
        assert!(!app.is_attached());
        let first = app.initialize().unwrap();
        // A launch fault would fire if initialize attached again.
        host.fail_next(HostFault::Launch);
        let second = app.initialize().unwrap();
        assert_eq!(first, second);
        assert!(app.is_attached());
    }

    #[test]
    fn host_access_attaches_lazily() {
        let host = MemoryHost::new();
        let mut app = ApplicationHandle::new(host.clone());
        let doc = app.host().unwrap().create_document().unwrap();
        assert!(host.document(doc).is_ok());
        assert!(app.status().visible);
    }

    #[test]
    fn missing_host_is_an_error() {
        let host = MemoryHost::new();
        host.set_installed(false);
        let mut app = ApplicationHandle::new(host);
        assert!(matches!(app.initialize(), Err(HostError::NotInstalled(_))));
        assert!(!app.is_attached());
    }

    #[test]
    fn reattaches_after_quit() {
        let host = MemoryHost::new();
        let mut app = ApplicationHandle::new(host.clone());
        app.initialize().unwrap();
        host.ui_quit();
        assert!(!app.is_attached());
        assert!(app.host().is_ok());
        assert!(host.status().running);
    }
}
