//! A process-wide [`Vfs`] instance for code that cannot thread a handle around.

use log::debug;
use parking_lot::{const_rwlock, RwLock};

use crate::{Result, Vfs, VfsError};

static INSTANCE: RwLock<Option<Vfs>> = const_rwlock(None);

/// Initializes the process-wide virtual filesystem
///
/// # Errors
///
/// Will return [`VfsError::AlreadyInitialized`] if it is already initialized
pub fn init() -> Result<()> {
    init_with(Vfs::new())
}

/// Installs the given virtual filesystem as the process-wide instance
///
/// # Errors
///
/// Will return [`VfsError::AlreadyInitialized`] if it is already initialized
pub fn init_with(vfs: Vfs) -> Result<()> {
    let mut instance = INSTANCE.write();
    if instance.is_some() {
        return Err(VfsError::AlreadyInitialized);
    }
    *instance = Some(vfs);
    Ok(())
}

/// Releases the process-wide virtual filesystem and all of its mounts
///
/// # Errors
///
/// Will return [`VfsError::NotInitialized`] if it is not initialized
pub fn deinit() -> Result<()> {
    INSTANCE
        .write()
        .take()
        .map(|_| debug!("Closed the virtual filesystem"))
        .ok_or(VfsError::NotInitialized)
}

#[must_use]
pub fn is_ready() -> bool {
    INSTANCE.read().is_some()
}

/// Runs `f` with shared access to the process-wide virtual filesystem.
///
/// The instance stays read-locked while `f` runs: calling [`with_mut`],
/// [`init`] or [`deinit`] from inside `f` deadlocks.
///
/// # Errors
///
/// Will return [`VfsError::NotInitialized`] if it is not initialized
pub fn with<R>(f: impl FnOnce(&Vfs) -> R) -> Result<R> {
    INSTANCE.read().as_ref().map(f).ok_or(VfsError::NotInitialized)
}

/// Runs `f` with exclusive access to the process-wide virtual filesystem.
///
/// The instance stays write-locked while `f` runs: any other function of
/// this module called from inside `f`, including loads through
/// `GlobalVfs` asset sources, deadlocks.
///
/// # Errors
///
/// Will return [`VfsError::NotInitialized`] if it is not initialized
pub fn with_mut<R>(f: impl FnOnce(&mut Vfs) -> R) -> Result<R> {
    INSTANCE.write().as_mut().map(f).ok_or(VfsError::NotInitialized)
}
