//! Work scope guard
//!
//! A [`WorkScope`] wraps one open host scope. It must be released with
//! [`WorkScope::commit`] or [`WorkScope::discard`]; if it is dropped on an
//! error path the scope is discarded.

use std::ops::{Deref, DerefMut};

use crate::host::{DrawingHost, HostResult, ScopeId};

/// Scope guard whose default disposition is discard
pub struct WorkScope<'h, H: DrawingHost + ?Sized> {
    host: &'h mut H,
    id: ScopeId,
    released: bool,
}

impl<'h, H: DrawingHost + ?Sized> WorkScope<'h, H> {
    /// Open a scope on `host`
    pub fn open(host: &'h mut H, label: &str) -> HostResult<Self> {
        let id = host.begin_scope(label)?;
        tracing::trace!("Opened {} ({})", id, label);
        Ok(Self {
            host,
            id,
            released: false,
        })
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Keep the scope's changes
    pub fn commit(mut self) -> HostResult<()> {
        self.released = true;
        self.host.commit_scope(self.id)
    }

    /// Roll back the scope's changes
    pub fn discard(mut self) -> HostResult<()> {
        self.released = true;
        self.host.discard_scope(self.id)
    }
}

impl<H: DrawingHost + ?Sized> Deref for WorkScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: DrawingHost + ?Sized> DerefMut for WorkScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: DrawingHost + ?Sized> Drop for WorkScope<'_, H> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.host.discard_scope(self.id) {
            tracing::warn!("Failed to discard {}: {}", self.id, e);
        }
    }
}
