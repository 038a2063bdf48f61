//! Card controller behind a lock, for stream and power events arriving from
//! different tasks.
//!
//! ```rust,ignore
//! static CARD: StaticCell<SharedCard<CriticalSectionRawMutex, Wm5102, Wm8804, I2s>> =
//!     StaticCell::new();
//! let card = CARD.init(SharedCard::new(CriticalSectionRawMutex::new(), sound_card));
//!
//! card.with(|c| c.open_stream(StreamDirection::Playback))?;
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::context::SoundCard;
use crate::error::Error;

/// A [`SoundCard`] guarded by one mutual-exclusion domain.
pub struct SharedCard<M: RawMutex, P, T, H> {
    inner: Mutex<M, RefCell<SoundCard<P, T, H>>>,
}

impl<M: RawMutex, P, T, H> SharedCard<M, P, T, H> {
    /// Wrap `card` using `raw` as the lock.
    pub const fn new(raw: M, card: SoundCard<P, T, H>) -> Self {
        Self {
            inner: Mutex::const_new(raw, RefCell::new(card)),
        }
    }

    /// Run `f` with exclusive access to the card.
    ///
    /// Calling back into `with` from inside `f` returns
    /// [`Error::Reentrant`] instead of deadlocking.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut SoundCard<P, T, H>) -> Result<R, Error>,
    ) -> Result<R, Error> {
        self.inner.lock(|cell| {
            let mut card = cell.try_borrow_mut().map_err(|_| {
                error!("re-entrant card access");
                Error::Reentrant
            })?;
            f(&mut card)
        })
    }

    /// Unwrap the card.
    pub fn into_inner(self) -> SoundCard<P, T, H> {
        self.inner.into_inner().into_inner()
    }
}
