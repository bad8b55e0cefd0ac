//! Per-request deadline handling.
//!
//! A [`Deadline`] is computed once per request from a monotonic clock and
//! consulted at every blocking read boundary, converting indefinite socket
//! waits into bounded operations.

use crate::base::neterror::NetError;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;

/// An absolute instant after which blocking reads must abort.
///
/// A disabled timeout is the explicit `None` sentinel, never a zero instant,
/// so "no timeout" can never be confused with "already expired".
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Deadline `timeout` from now. A zero timeout disables the deadline.
    pub fn after(timeout: Duration) -> Self {
        if timeout.is_zero() {
            Deadline(None)
        } else {
            Deadline(Some(Instant::now() + timeout))
        }
    }

    /// An absolute deadline.
    pub fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    /// The "no deadline" sentinel.
    pub fn none() -> Self {
        Deadline(None)
    }

    /// Fails with [`NetError::ConnectionTimeout`] once the deadline has passed.
    pub fn check(&self) -> Result<(), NetError> {
        match self.0 {
            Some(at) if Instant::now() >= at => Err(NetError::ConnectionTimeout),
            _ => Ok(()),
        }
    }

    /// Time left before the deadline, saturating at zero. `None` when the
    /// deadline is disabled.
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }
}

/// A single socket read bounded by the deadline.
///
/// The deadline is checked before the read is attempted, so an expired
/// deadline fails without consuming any bytes; a read that never completes
/// is abandoned when the deadline arrives.
pub(crate) async fn read_bounded<R>(
    reader: &mut R,
    buf: &mut [u8],
    deadline: &Deadline,
) -> Result<usize, NetError>
where
    R: AsyncRead + Unpin,
{
    deadline.check()?;
    let read = reader.read(buf);
    let result = match deadline.remaining() {
        Some(limit) => tokio::time::timeout(limit, read)
            .await
            .map_err(|_| NetError::ConnectionTimeout)?,
        None => read.await,
    };
    result.map_err(|e| NetError::network(format!("socket read failed: {e}")))
}
